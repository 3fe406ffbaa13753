//! Scalar finite-difference mode solver.
//!
//! Discretises the scalar Helmholtz equation
//! $\nabla_t^2 E + n^2 k_0^2 E = \beta^2 E$ on a uniform grid with the
//! 5-point stencil and Dirichlet boundaries, then extracts the bound
//! modes — the eigenvalues closest to the core light line
//! $\sigma = (n_\text{core} k_0)^2$ — with shift-invert Lanczos.
//!
//! # Method selection
//!
//! The eigensolver needs one shifted linear solve per Lanczos step, and
//! the method is chosen by problem size, like the direct/iterative split
//! in any large-system solver:
//!
//! - **Direct** (LU via `faer`): the shifted operator is densified and
//!   factorised once. Exact, but O(n³) to factorise and O(n²) memory, so
//!   only used for `n ≤ direct_threshold`.
//! - **Iterative** (MINRES): matrix-free over the CSR matvec, O(n) memory
//!   per iteration. Used for everything larger.

pub mod assembly;
pub mod direct;
pub mod iterative;
pub mod lanczos;

use log::debug;
use modalis_geometry::discretise::sample_index_field;

use crate::fields;
use crate::grid::Grid;
use crate::solver::{ModeSolver, SolverError};
use crate::types::{ModeSet, WaveguideConfig};

use self::lanczos::EigenOptions;

/// A solver for the shifted system `(A − σM) x = b`, applied once per
/// Lanczos step.
pub trait ShiftedSolve {
    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, SolverError>;
}

/// The scalar finite-difference mode solver.
pub struct FdModeSolver {
    /// Matrix dimension above which the inner shifted solve switches from
    /// dense LU to matrix-free MINRES.
    pub direct_threshold: usize,
    /// Maximum Lanczos subspace dimension; `None` derives a budget from
    /// the requested mode count.
    pub max_subspace: Option<usize>,
}

impl Default for FdModeSolver {
    fn default() -> Self {
        Self {
            direct_threshold: 1024,
            max_subspace: None,
        }
    }
}

impl FdModeSolver {
    pub fn new(direct_threshold: usize) -> Self {
        Self {
            direct_threshold,
            ..Default::default()
        }
    }

    fn subspace_budget(&self, dim: usize, num_modes: usize) -> usize {
        self.max_subspace
            .unwrap_or_else(|| (4 * num_modes).max(120))
            .clamp(num_modes, dim)
    }
}

impl ModeSolver for FdModeSolver {
    fn solve(&self, config: &WaveguideConfig) -> Result<ModeSet, SolverError> {
        config.validate()?;
        let grid = Grid::new(config.domain_size, config.resolution)?;
        if config.num_modes > grid.len() {
            return Err(SolverError::InvalidConfiguration(format!(
                "requested {} modes but the grid has only {} points",
                config.num_modes,
                grid.len()
            )));
        }

        let index_field = sample_index_field(
            &config.cross_section,
            grid.x(),
            grid.y(),
            config.n_core,
            config.n_clad,
        );

        let laplacian = assembly::assemble_laplacian(&grid);
        let mass = assembly::assemble_mass_matrix(&index_field, &grid);
        let stiffness = laplacian.scaled(-1.0);

        let k0 = config.k0();
        let helmholtz = assembly::assemble_helmholtz(&stiffness, &mass, k0);
        let sigma = (config.n_core * k0).powi(2);
        let dim = grid.len();
        let shifted = helmholtz.with_shifted_diagonal(&vec![-sigma; dim]);

        // The eigensolve runs on the unit-mass pencil `H v = β² v`: the
        // permittivity enters through the Helmholtz operator, and the
        // returned vectors are orthonormal in the plain inner product.
        let unit_mass = vec![1.0; dim];

        let inner: Box<dyn ShiftedSolve> = if dim <= self.direct_threshold {
            debug!("inner solve: dense LU ({dim} unknowns)");
            Box::new(direct::LuShiftedSolve::factorise(&shifted))
        } else {
            debug!("inner solve: MINRES ({dim} unknowns)");
            let inner_tolerance = (config.solver_tolerance * 1e-2).max(1e-14);
            Box::new(iterative::MinresShiftedSolve::new(
                shifted,
                inner_tolerance,
                config.max_iterations,
            ))
        };

        let opts = EigenOptions {
            num_pairs: config.num_modes,
            sigma,
            tolerance: config.solver_tolerance,
            max_subspace: self.subspace_budget(dim, config.num_modes),
        };
        let pairs = lanczos::shift_invert_eigenpairs(inner.as_ref(), &unit_mass, &opts)?;

        let modes = fields::postprocess(pairs, &grid, k0)?;
        Ok(ModeSet {
            modes,
            grid,
            index_field,
        })
    }

    fn method_name(&self) -> &str {
        "Scalar finite differences (5-point stencil)"
    }
}
