//! Direct LU solver for small shifted systems.
//!
//! Below the method-selection threshold the shifted operator is densified
//! and factorised once with LU decomposition via `faer`; every Lanczos
//! step then reuses the factorisation, so the per-step cost is a pair of
//! triangular solves. The densification is bounded by the threshold — the
//! assembled operators themselves always stay in CSR form.

use faer::linalg::solvers::SpSolver;

use super::ShiftedSolve;
use crate::solver::SolverError;
use crate::sparse::CsrMatrix;

/// Shifted-system solver backed by a dense `faer` LU factorisation.
pub struct LuShiftedSolve {
    lu: faer::linalg::solvers::PartialPivLu<f64>,
    dim: usize,
}

impl LuShiftedSolve {
    /// Densify the shifted operator and factorise it with partial
    /// pivoting.
    pub fn factorise(matrix: &CsrMatrix) -> Self {
        let dim = matrix.n_rows();
        assert_eq!(dim, matrix.n_cols(), "shifted operator must be square");

        let dense = faer::Mat::<f64>::from_fn(dim, dim, |i, j| matrix.get(i, j));
        Self {
            lu: dense.partial_piv_lu(),
            dim,
        }
    }
}

impl ShiftedSolve for LuShiftedSolve {
    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, SolverError> {
        assert_eq!(rhs.len(), self.dim, "rhs length must match the factorisation");

        let b = faer::Col::<f64>::from_fn(self.dim, |i| rhs[i]);
        let sol = self.lu.solve(&b);
        Ok((0..self.dim).map(|i| sol[i]).collect())
    }
}
