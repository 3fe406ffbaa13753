//! Parametric waveguide cross-sections.
//!
//! Each cross-section defines the core region of a waveguide in the
//! transverse $(x, y)$ plane, centred on the origin. Cross-sections are
//! fully described by their TOML parameters and carry no material data:
//! the index values are attached at sampling time by
//! [`discretise`](crate::discretise).

use serde::{Deserialize, Serialize};

/// A waveguide core shape that can be sampled onto an index grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossSection {
    Strip(Strip),
    Slab(Slab),
}

/// A rectangular strip core, the standard silicon-photonics geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strip {
    /// Core width along x (µm).
    pub width: f64,
    /// Core thickness along y (µm).
    pub thickness: f64,
}

/// An infinite slab: a single guiding layer, uniform along x.
///
/// Useful as a benchmark geometry, since the slab has an exact analytic
/// dispersion relation to compare against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slab {
    /// Layer thickness along y (µm).
    pub thickness: f64,
}

impl CrossSection {
    /// Check whether a transverse point lies inside the core region.
    ///
    /// Containment is strict: a core edge that falls exactly on a grid
    /// line samples as cladding, so the edge is never double-counted.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            CrossSection::Strip(s) => x.abs() < s.width / 2.0 && y.abs() < s.thickness / 2.0,
            CrossSection::Slab(s) => y.abs() < s.thickness / 2.0,
        }
    }

    /// Axis-aligned bounding box of the core: returns (min corner, max corner).
    ///
    /// A [`Slab`] is unbounded along x; renderers outlining the core should
    /// clip the box to the simulation window.
    pub fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        match self {
            CrossSection::Strip(s) => (
                [-s.width / 2.0, -s.thickness / 2.0],
                [s.width / 2.0, s.thickness / 2.0],
            ),
            CrossSection::Slab(s) => (
                [f64::NEG_INFINITY, -s.thickness / 2.0],
                [f64::INFINITY, s.thickness / 2.0],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_containment() {
        let strip = CrossSection::Strip(Strip {
            width: 0.45,
            thickness: 0.22,
        });

        assert!(strip.contains(0.0, 0.0));
        assert!(strip.contains(0.22, 0.10));
        assert!(!strip.contains(0.23, 0.0), "outside the width");
        assert!(!strip.contains(0.0, 0.12), "outside the thickness");
        // The edge itself is cladding.
        assert!(!strip.contains(0.225, 0.0));
        assert!(!strip.contains(0.0, 0.11));
    }

    #[test]
    fn test_slab_ignores_x() {
        let slab = CrossSection::Slab(Slab { thickness: 0.22 });

        assert!(slab.contains(0.0, 0.0));
        assert!(slab.contains(1e6, 0.10));
        assert!(!slab.contains(0.0, 0.11));
        assert!(!slab.contains(-1e6, -0.2));
    }

    #[test]
    fn test_strip_bounding_box() {
        let strip = CrossSection::Strip(Strip {
            width: 0.45,
            thickness: 0.22,
        });
        let (min, max) = strip.bounding_box();
        assert_eq!(min, [-0.225, -0.11]);
        assert_eq!(max, [0.225, 0.11]);
    }
}
