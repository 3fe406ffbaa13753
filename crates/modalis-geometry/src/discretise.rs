//! Sampling of cross-sections into refractive-index fields.
//!
//! Each grid cell is classified as core or cladding by its centre
//! coordinate, producing a binary step profile: every cell holds exactly
//! `n_core` or `n_clad`, with no anti-aliasing of the core boundary
//! against the grid. The resulting staircase error is proportional to the
//! grid spacing and is the dominant discretisation error source for
//! geometries whose edges fall between grid lines.

use ndarray::Array2;

use crate::profiles::CrossSection;

/// Sample a cross-section onto a rectangular grid of index values.
///
/// # Arguments
/// * `section` - The waveguide cross-section.
/// * `x` - Grid coordinates along x (µm).
/// * `y` - Grid coordinates along y (µm).
/// * `n_core` - Refractive index assigned to core cells.
/// * `n_clad` - Refractive index assigned to cladding cells.
///
/// # Returns
/// An index field of shape `(y.len(), x.len())`, indexed `[[iy, ix]]`.
pub fn sample_index_field(
    section: &CrossSection,
    x: &[f64],
    y: &[f64],
    n_core: f64,
    n_clad: f64,
) -> Array2<f64> {
    assert!(!x.is_empty() && !y.is_empty(), "grid must be non-empty");

    let mut field = Array2::from_elem((y.len(), x.len()), n_clad);
    for (iy, &yc) in y.iter().enumerate() {
        for (ix, &xc) in x.iter().enumerate() {
            if section.contains(xc, yc) {
                field[[iy, ix]] = n_core;
            }
        }
    }
    field
}
