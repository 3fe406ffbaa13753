//! Mode solver abstraction and implementations.
//!
//! The [`ModeSolver`] trait defines the interface that all discretisation
//! methods must implement. The scalar finite-difference solver
//! ([`fd::FdModeSolver`]) is the first implementation; a semivectorial or
//! full-vector discretisation would implement the same trait.

pub mod fd;

use thiserror::Error;

use crate::types::{ModeSet, WaveguideConfig};

/// Errors that can occur during a mode solve.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Bad grid, geometry, or mode-count parameters, detected before any
    /// assembly takes place.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The eigensolver (or its inner linear solver) did not converge.
    ///
    /// Never retried internally; the caller may retry with an adjusted
    /// shift, tolerance, or mode count.
    #[error("Eigensolver failed to converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// A returned eigenvector has zero amplitude everywhere, so it cannot
    /// be normalised into a field map.
    #[error("Mode {index} has a null field")]
    DegenerateMode { index: usize },
}

/// The core trait that all mode-solving methods implement.
///
/// The abstraction lets callers (sweep drivers, renderers) operate against
/// any solver without knowledge of the underlying numerical method.
pub trait ModeSolver {
    /// Solve for the guided modes of the configured waveguide.
    fn solve(&self, config: &WaveguideConfig) -> Result<ModeSet, SolverError>;

    /// Human-readable name of the discretisation method.
    fn method_name(&self) -> &str;
}
