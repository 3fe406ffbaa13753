//! Uniform simulation grid and the 2D↔1D index mapping.

use crate::solver::SolverError;

/// A uniform N×N grid over the square simulation window.
///
/// The window spans `[-domain_size/2, +domain_size/2]` along both axes
/// with `n` samples per axis, endpoints included. The stencil spacing is
/// `dx = domain_size / n`; the coordinate step is `domain_size / (n - 1)`,
/// an O(dx) mismatch inherited from the reference discretisation.
#[derive(Debug, Clone)]
pub struct Grid {
    n: usize,
    dx: f64,
    domain_size: f64,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Grid {
    /// Build a grid from the window size and sampling density.
    ///
    /// The sample count per axis is `n = round(domain_size * resolution)`.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `domain_size <= 0`, `resolution == 0`, or
    /// the resulting `n < 3` (too few points for a 3-point stencil).
    pub fn new(domain_size: f64, resolution: usize) -> Result<Self, SolverError> {
        if !(domain_size > 0.0) {
            return Err(SolverError::InvalidConfiguration(format!(
                "domain_size must be positive, got {domain_size}"
            )));
        }
        if resolution == 0 {
            return Err(SolverError::InvalidConfiguration(
                "resolution must be positive".into(),
            ));
        }

        let n = (domain_size * resolution as f64).round() as usize;
        if n < 3 {
            return Err(SolverError::InvalidConfiguration(format!(
                "{n} samples per axis is too few for a 3-point stencil; \
                 increase domain_size or resolution"
            )));
        }

        let dx = domain_size / n as f64;
        let half = domain_size / 2.0;
        let step = domain_size / (n - 1) as f64;
        let x: Vec<f64> = (0..n).map(|i| -half + i as f64 * step).collect();
        let y = x.clone();

        Ok(Self {
            n,
            dx,
            domain_size,
            x,
            y,
        })
    }

    /// Samples per axis.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Stencil spacing (µm).
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Width of the square simulation window (µm).
    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// x coordinates (µm).
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// y coordinates (µm).
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Total number of grid cells, `n²` — the dimension of the assembled
    /// operators.
    pub fn len(&self) -> usize {
        self.n * self.n
    }

    /// Flatten a 2D cell index to the row-major operator index.
    ///
    /// Every component that maps between fields and operator rows goes
    /// through this helper: the Laplacian rows, the mass-matrix diagonal,
    /// and the eigenvector reshape all assume the same ordering, and a
    /// mismatch between any two of them silently scrambles the results.
    #[inline]
    pub fn idx(&self, ix: usize, iy: usize) -> usize {
        debug_assert!(ix < self.n && iy < self.n);
        iy * self.n + ix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_dimensions() {
        let grid = Grid::new(2.0, 50).unwrap();
        assert_eq!(grid.n(), 100);
        assert_eq!(grid.len(), 10_000);
        assert_abs_diff_eq!(grid.dx(), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_coordinates_span_window_inclusive() {
        let grid = Grid::new(2.0, 10).unwrap();
        assert_abs_diff_eq!(grid.x()[0], -1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(*grid.x().last().unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(grid.x().len(), grid.n());
        assert_eq!(grid.x(), grid.y());
    }

    #[test]
    fn test_row_major_index_mapping() {
        let grid = Grid::new(1.0, 5).unwrap();
        assert_eq!(grid.idx(0, 0), 0);
        assert_eq!(grid.idx(4, 0), 4);
        assert_eq!(grid.idx(0, 1), 5);
        assert_eq!(grid.idx(3, 2), 13);
    }

    #[test]
    fn test_rejects_non_positive_domain() {
        assert!(matches!(
            Grid::new(0.0, 50),
            Err(SolverError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Grid::new(-1.0, 50),
            Err(SolverError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_resolution() {
        assert!(matches!(
            Grid::new(2.0, 0),
            Err(SolverError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_grids_below_stencil_width() {
        // round(0.5 * 4) = 2 samples: no interior point for the stencil.
        assert!(matches!(
            Grid::new(0.5, 4),
            Err(SolverError::InvalidConfiguration(_))
        ));
        // Three samples is the minimum.
        assert!(Grid::new(0.6, 5).is_ok());
    }
}
