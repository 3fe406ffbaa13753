//! Finite-difference operator assembly.
//!
//! Constructs the two N²×N² operator products of the discretisation, both
//! flattened with the grid's row-major [`idx`](crate::grid::Grid::idx)
//! mapping so that index $i$ refers to the same cell in each:
//!
//! - the 5-point Laplacian $L$ with Dirichlet boundaries (grid edges are
//!   field-zero, not reflected or periodic), and
//! - the diagonal permittivity (mass) matrix $M = \mathrm{diag}(n^2)$.
//!
//! From these the pipeline forms the Helmholtz operator
//! $k_0^2 M + L$, whose eigenvalues near the shift are the squared
//! propagation constants $\beta^2$ of the guided modes.
//!
//! The matrices are written row by row, directly in CSR order — each row
//! is the cell itself plus up to four direct neighbours, so the sparsity
//! pattern is known in advance and no intermediate triplet list is needed.

use ndarray::Array2;

use crate::grid::Grid;
use crate::sparse::CsrMatrix;

/// Assemble the 2D 5-point Laplacian with Dirichlet boundaries.
///
/// Row `idx(ix, iy)` holds `-4/dx²` on the diagonal and `+1/dx²` for each
/// in-grid direct neighbour; neighbours beyond the grid edge are dropped,
/// which is exactly the Dirichlet (field-zero) truncation. The result is
/// symmetric, has at most five nonzeros per row, and interior rows sum to
/// zero.
pub fn assemble_laplacian(grid: &Grid) -> CsrMatrix {
    let n = grid.n();
    let dim = grid.len();
    let inv_dx2 = 1.0 / (grid.dx() * grid.dx());

    let mut row_ptr = Vec::with_capacity(dim + 1);
    let mut col_idx = Vec::with_capacity(5 * dim);
    let mut values = Vec::with_capacity(5 * dim);

    row_ptr.push(0);
    for iy in 0..n {
        for ix in 0..n {
            // Columns in strictly increasing order: south, west, centre,
            // east, north.
            if iy > 0 {
                col_idx.push(grid.idx(ix, iy - 1));
                values.push(inv_dx2);
            }
            if ix > 0 {
                col_idx.push(grid.idx(ix - 1, iy));
                values.push(inv_dx2);
            }
            col_idx.push(grid.idx(ix, iy));
            values.push(-4.0 * inv_dx2);
            if ix + 1 < n {
                col_idx.push(grid.idx(ix + 1, iy));
                values.push(inv_dx2);
            }
            if iy + 1 < n {
                col_idx.push(grid.idx(ix, iy + 1));
                values.push(inv_dx2);
            }
            row_ptr.push(col_idx.len());
        }
    }

    CsrMatrix::new(dim, dim, row_ptr, col_idx, values)
}

/// Assemble the diagonal mass matrix `diag(n²)` from a sampled index field.
///
/// The field is flattened in the same row-major order as the Laplacian
/// rows; entry `idx(ix, iy)` is the squared index of cell `(ix, iy)`.
pub fn assemble_mass_matrix(index_field: &Array2<f64>, grid: &Grid) -> CsrMatrix {
    let n = grid.n();
    assert_eq!(
        index_field.dim(),
        (n, n),
        "index field does not match the grid"
    );

    let mut diag = vec![0.0; grid.len()];
    for iy in 0..n {
        for ix in 0..n {
            let nv = index_field[[iy, ix]];
            diag[grid.idx(ix, iy)] = nv * nv;
        }
    }
    CsrMatrix::from_diagonal(&diag)
}

/// Form the Helmholtz operator `k0²·M − A` from the stiffness `A = −L`
/// and the mass matrix.
///
/// Its spectrum is bounded above by `(n_core·k0)²`, and the eigenvalues
/// closest to that bound are the squared propagation constants of the
/// bound modes.
pub fn assemble_helmholtz(stiffness: &CsrMatrix, mass: &CsrMatrix, k0: f64) -> CsrMatrix {
    let weighted: Vec<f64> = mass.diagonal().iter().map(|m| k0 * k0 * m).collect();
    stiffness.scaled(-1.0).with_shifted_diagonal(&weighted)
}
