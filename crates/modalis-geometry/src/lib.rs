//! # Modalis Geometry
//!
//! Waveguide cross-section handling for the Modalis mode solver. This
//! crate provides:
//!
//! - **Parametric cross-sections** ([`profiles`]) — Strip and slab cores
//!   defined by simple parameters.
//! - **Index sampling** ([`discretise`]) — Converts a cross-section into a
//!   binary refractive-index field on a uniform grid.

pub mod discretise;
pub mod profiles;
