//! Core types shared across the Modalis pipeline.
//!
//! This module defines the immutable run configuration and the result
//! containers handed to external renderers.

use modalis_geometry::profiles::{CrossSection, Strip};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::solver::SolverError;

/// Parameters defining a single mode solve.
///
/// The configuration is fixed for the duration of one solve; sweeps over
/// wavelength or geometry are a caller-level loop over fresh configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveguideConfig {
    /// Free-space wavelength (µm). Sets `k0` and the eigensolver shift.
    pub wavelength: f64,
    /// Core refractive index.
    pub n_core: f64,
    /// Cladding refractive index. Guided modes exist only for
    /// `n_core > n_clad`; this is assumed, not validated.
    pub n_clad: f64,
    /// Waveguide core cross-section.
    pub cross_section: CrossSection,
    /// Width of the square simulation window (µm).
    pub domain_size: f64,
    /// Grid density (samples per µm).
    pub resolution: usize,
    /// Number of eigenpairs requested.
    pub num_modes: usize,
    /// Relative-residual target for the eigensolver.
    pub solver_tolerance: f64,
    /// Iteration cap for the inner (MINRES) linear solver.
    pub max_iterations: usize,
}

impl Default for WaveguideConfig {
    /// The standard 450 × 220 nm SOI strip at telecom wavelength.
    fn default() -> Self {
        Self {
            wavelength: 1.55,
            n_core: 3.48,
            n_clad: 1.44,
            cross_section: CrossSection::Strip(Strip {
                width: 0.45,
                thickness: 0.22,
            }),
            domain_size: 2.0,
            resolution: 50,
            num_modes: 2,
            solver_tolerance: 1e-8,
            max_iterations: 20_000,
        }
    }
}

impl WaveguideConfig {
    /// Free-space wavenumber `k0 = 2π / λ` (µm⁻¹).
    pub fn k0(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.wavelength
    }

    /// Validate the scalar parameters, failing fast before any assembly.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.wavelength > 0.0) {
            return Err(SolverError::InvalidConfiguration(format!(
                "wavelength must be positive, got {}",
                self.wavelength
            )));
        }
        if !(self.n_core > 0.0) || !(self.n_clad > 0.0) {
            return Err(SolverError::InvalidConfiguration(
                "refractive indices must be positive".into(),
            ));
        }
        let dims_ok = match &self.cross_section {
            CrossSection::Strip(s) => s.width > 0.0 && s.thickness > 0.0,
            CrossSection::Slab(s) => s.thickness > 0.0,
        };
        if !dims_ok {
            return Err(SolverError::InvalidConfiguration(
                "cross-section dimensions must be positive".into(),
            ));
        }
        if self.num_modes == 0 {
            return Err(SolverError::InvalidConfiguration(
                "num_modes must be at least 1".into(),
            ));
        }
        if !(self.solver_tolerance > 0.0) {
            return Err(SolverError::InvalidConfiguration(
                "solver_tolerance must be positive".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfiguration(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A single guided mode.
#[derive(Debug, Clone)]
pub struct Mode {
    /// Eigenvalue `β²` of the discrete problem (µm⁻²).
    pub beta_sq: f64,
    /// Effective index `β / k0`.
    pub n_eff: f64,
    /// Field profile, shape `(n, n)` indexed `[[iy, ix]]`, normalised so
    /// the peak magnitude is 1.
    pub field: Array2<f64>,
}

/// Results of a mode solve.
///
/// Modes are ordered **descending by effective index**: `modes[0]` is the
/// fundamental. The grid and the sampled index field are carried along so
/// an external renderer can draw field maps with the core outline and the
/// per-mode effective index.
#[derive(Debug, Clone)]
pub struct ModeSet {
    pub modes: Vec<Mode>,
    /// The grid the fields are sampled on.
    pub grid: Grid,
    /// The sampled refractive-index field, shape `(n, n)`.
    pub index_field: Array2<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WaveguideConfig::default().validate().is_ok());
    }

    #[test]
    fn test_wavenumber() {
        let config = WaveguideConfig::default();
        assert_relative_eq!(config.k0(), 4.053667, max_relative = 1e-6);
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let mut config = WaveguideConfig::default();
        config.wavelength = -1.55;
        assert!(config.validate().is_err());

        let mut config = WaveguideConfig::default();
        config.num_modes = 0;
        assert!(config.validate().is_err());

        let mut config = WaveguideConfig::default();
        config.cross_section = CrossSection::Strip(Strip {
            width: 0.0,
            thickness: 0.22,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = WaveguideConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: WaveguideConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolution, config.resolution);
        assert!(matches!(back.cross_section, CrossSection::Strip(_)));
    }
}
