//! Mode postprocessing: raw eigenpairs into renderer-ready field maps.
//!
//! Each length-N² eigenvector is folded back into an N×N field through
//! the grid's row-major [`idx`](crate::grid::Grid::idx) helper — the same
//! mapping the operators were assembled with — then normalised so its
//! peak magnitude is 1, giving values in $[-1, 1]$.

use ndarray::Array2;

use crate::grid::Grid;
use crate::solver::fd::lanczos::EigenPairs;
use crate::solver::SolverError;
use crate::types::Mode;

/// Turn eigenpairs into sorted, normalised [`Mode`]s.
///
/// Modes are ordered **descending by effective index**, so `modes[0]` is
/// the fundamental. (For this pencil, descending `n_eff` and descending
/// eigenvalue are the same ordering; the convention is stated here once
/// because reversing it silently relabels the fundamental mode.)
///
/// # Arguments
/// * `pairs` - Eigenpairs from the shift-invert solve.
/// * `grid` - The grid the eigenvectors are sampled on.
/// * `k0` - Free-space wavenumber, for `n_eff = sqrt(β²)/k0`.
///
/// # Errors
/// `DegenerateMode` if an eigenvector is zero everywhere; `index` refers
/// to the pair's position in the unsorted input.
pub fn postprocess(pairs: EigenPairs, grid: &Grid, k0: f64) -> Result<Vec<Mode>, SolverError> {
    let n = grid.n();
    let mut modes = Vec::with_capacity(pairs.values.len());

    for (index, (beta_sq, vector)) in pairs
        .values
        .iter()
        .zip(pairs.vectors.iter())
        .enumerate()
    {
        debug_assert_eq!(vector.len(), grid.len());

        let mut field = Array2::zeros((n, n));
        for iy in 0..n {
            for ix in 0..n {
                field[[iy, ix]] = vector[grid.idx(ix, iy)];
            }
        }

        let peak = field.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if peak == 0.0 {
            return Err(SolverError::DegenerateMode { index });
        }
        field.mapv_inplace(|v| v / peak);

        modes.push(Mode {
            beta_sq: *beta_sq,
            n_eff: beta_sq.sqrt() / k0,
            field,
        });
    }

    modes.sort_by(|a, b| b.n_eff.total_cmp(&a.n_eff));
    Ok(modes)
}
