//! Iterative MINRES solver for large shifted systems.
//!
//! The shifted operator $A - \sigma M$ is symmetric but indefinite, so
//! plain CG does not apply. MINRES (Paige & Saunders, 1975) minimises the
//! residual over the growing Krylov subspace using only matrix-vector
//! products, which keeps memory at O(N) and the operator in CSR form —
//! no factorisation is ever formed.

use log::debug;

use super::ShiftedSolve;
use crate::solver::SolverError;
use crate::sparse::CsrMatrix;

/// Shifted-system solver backed by MINRES, for systems too large to
/// densify.
pub struct MinresShiftedSolve {
    matrix: CsrMatrix,
    tolerance: f64,
    max_iterations: usize,
}

impl MinresShiftedSolve {
    /// Wrap the shifted operator; each [`solve`](ShiftedSolve::solve)
    /// call iterates from scratch.
    pub fn new(matrix: CsrMatrix, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            matrix,
            tolerance,
            max_iterations,
        }
    }
}

impl ShiftedSolve for MinresShiftedSolve {
    fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, SolverError> {
        minres(&self.matrix, rhs, self.tolerance, self.max_iterations)
    }
}

/// Solve the symmetric (possibly indefinite) system `A x = b` with MINRES.
///
/// Follows the Paige–Saunders recurrences: a Lanczos tridiagonalisation
/// updated by Givens rotations, with the solution accumulated through the
/// rotated direction vectors.
///
/// # Arguments
/// * `a` - Symmetric system matrix.
/// * `b` - Right-hand side.
/// * `tolerance` - Relative residual target, `‖b − Ax‖ ≤ tolerance·‖b‖`.
/// * `max_iterations` - Iteration cap.
///
/// # Errors
/// `ConvergenceFailure` if the cap is reached before the residual target.
pub fn minres(
    a: &CsrMatrix,
    b: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<Vec<f64>, SolverError> {
    let n = b.len();
    assert_eq!(a.n_rows(), n, "matrix/rhs dimension mismatch");
    assert_eq!(a.n_cols(), n, "matrix must be square");

    let beta1 = norm(b);
    let mut x = vec![0.0; n];
    if beta1 == 0.0 {
        return Ok(x);
    }

    // Lanczos state.
    let mut r1 = b.to_vec();
    let mut r2 = b.to_vec();
    let mut y = b.to_vec();
    let mut v = vec![0.0; n];
    let mut beta = beta1;
    let mut oldb = 0.0;

    // Rotation state.
    let mut cs = -1.0_f64;
    let mut sn = 0.0_f64;
    let mut dbar = 0.0;
    let mut epsln = 0.0;
    let mut phibar = beta1;

    // Direction vectors.
    let mut w = vec![0.0; n];
    let mut w1 = vec![0.0; n];
    let mut w2 = vec![0.0; n];

    for itn in 1..=max_iterations {
        // Next Lanczos vector.
        for (vi, yi) in v.iter_mut().zip(&y) {
            *vi = yi / beta;
        }
        a.matvec(&v, &mut y);
        if itn >= 2 {
            let s = beta / oldb;
            for (yi, ri) in y.iter_mut().zip(&r1) {
                *yi -= s * ri;
            }
        }
        let alfa = dot(&v, &y);
        let s = alfa / beta;
        for (yi, ri) in y.iter_mut().zip(&r2) {
            *yi -= s * ri;
        }
        r1.copy_from_slice(&r2);
        r2.copy_from_slice(&y);
        oldb = beta;
        beta = norm(&y);

        // Apply the previous rotation, generate the next.
        let oldeps = epsln;
        let delta = cs * dbar + sn * alfa;
        let gbar = sn * dbar - cs * alfa;
        epsln = sn * beta;
        dbar = -cs * beta;

        let gamma = (gbar * gbar + beta * beta).sqrt().max(f64::EPSILON);
        cs = gbar / gamma;
        sn = beta / gamma;
        let phi = cs * phibar;
        phibar *= sn;

        // Update the solution along the rotated direction.
        std::mem::swap(&mut w1, &mut w2);
        std::mem::swap(&mut w2, &mut w);
        let denom = 1.0 / gamma;
        for i in 0..n {
            w[i] = (v[i] - oldeps * w1[i] - delta * w2[i]) * denom;
            x[i] += phi * w[i];
        }

        let relres = phibar / beta1;
        if relres <= tolerance {
            debug!("minres converged in {itn} iterations (relres {relres:.2e})");
            return Ok(x);
        }
    }

    Err(SolverError::ConvergenceFailure {
        iterations: max_iterations,
        residual: phibar / beta1,
    })
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
