//! Validate the finite-difference solver against physics bounds and the
//! analytic slab dispersion.

use modalis_core::slab::slab_te_modes;
use modalis_core::solver::{fd::FdModeSolver, ModeSolver, SolverError};
use modalis_core::types::WaveguideConfig;
use modalis_geometry::profiles::{CrossSection, Slab, Strip};

/// Grid position of the field-magnitude peak, in physical coordinates.
fn peak_position(result: &modalis_core::types::ModeSet, mode: usize) -> (f64, f64) {
    let field = &result.modes[mode].field;
    let mut best = (0, 0);
    let mut best_mag = -1.0;
    for ((iy, ix), &v) in field.indexed_iter() {
        if v.abs() > best_mag {
            best_mag = v.abs();
            best = (iy, ix);
        }
    }
    (result.grid.x()[best.1], result.grid.y()[best.0])
}

#[test]
fn test_soi_strip_standard_scenario() {
    // The workhorse single-mode SOI strip: 450 × 220 nm core at λ = 1.55 µm.
    let config = WaveguideConfig {
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
        ..Default::default()
    };
    let result = FdModeSolver::default().solve(&config).unwrap();
    assert_eq!(result.modes.len(), 2);

    eprintln!("=== SOI strip 450x220 nm, λ=1.55 µm, 100x100 grid ===");
    eprintln!("{:>6} {:>10} {:>12}", "mode", "n_eff", "beta² (µm⁻²)");
    for (i, mode) in result.modes.iter().enumerate() {
        eprintln!("{:6} {:10.4} {:12.4}", i, mode.n_eff, mode.beta_sq);
    }

    for mode in &result.modes {
        assert!(mode.beta_sq > 0.0, "propagation constants must be positive");
        let peak = mode.field.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!((peak - 1.0).abs() < 1e-9, "fields must be peak-normalised");
    }

    let fundamental = &result.modes[0];
    assert!(
        fundamental.n_eff > config.n_clad && fundamental.n_eff < config.n_core,
        "fundamental n_eff {} outside the guided window",
        fundamental.n_eff
    );
    assert!(
        fundamental.n_eff > 1.9,
        "fundamental should be strongly guided, got n_eff {}",
        fundamental.n_eff
    );
    assert!(
        result.modes[1].n_eff < fundamental.n_eff,
        "modes must be ordered descending by effective index"
    );

    // The infinite slab of the same thickness is strictly more confining
    // than the strip, so its exact n_eff is an upper bound.
    let slab_bound = slab_te_modes(1.55, 3.48, 1.44, 0.22)[0];
    assert!(
        fundamental.n_eff < slab_bound,
        "strip n_eff {} should lie below the slab bound {}",
        fundamental.n_eff,
        slab_bound
    );

    // The fundamental peaks inside the core rectangle.
    let (px, py) = peak_position(&result, 0);
    assert!(
        px.abs() < 0.225 && py.abs() < 0.11,
        "fundamental peak at ({px}, {py}) is outside the core"
    );
}

#[test]
fn test_pipeline_is_deterministic() {
    let config = WaveguideConfig {
        resolution: 30,
        num_modes: 2,
        ..Default::default()
    };
    let solver = FdModeSolver::default();
    let first = solver.solve(&config).unwrap();
    let second = solver.solve(&config).unwrap();

    for (a, b) in first.modes.iter().zip(&second.modes) {
        assert!(
            (a.n_eff - b.n_eff).abs() < 1e-12,
            "eigenvalues changed between identical runs"
        );
        let max_diff = a
            .field
            .iter()
            .zip(b.field.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_diff < 1e-12, "fields changed between identical runs");
    }
}

#[test]
fn test_direct_and_iterative_paths_agree() {
    let config = WaveguideConfig {
        resolution: 15,
        num_modes: 1,
        ..Default::default()
    };

    // 30×30 grid = 900 unknowns: below the default threshold.
    let direct = FdModeSolver::default().solve(&config).unwrap();
    // Forcing the threshold to zero routes the same solve through MINRES.
    let iterative = FdModeSolver::new(0).solve(&config).unwrap();

    let d = direct.modes[0].n_eff;
    let m = iterative.modes[0].n_eff;
    eprintln!("direct n_eff = {d:.8}, minres n_eff = {m:.8}");
    assert!(
        (d - m).abs() < 1e-6,
        "direct ({d}) and iterative ({m}) inner solves disagree"
    );
}

#[test]
fn test_slab_cross_section_matches_analytic_dispersion() {
    let config = WaveguideConfig {
        cross_section: CrossSection::Slab(Slab { thickness: 0.22 }),
        num_modes: 1,
        ..Default::default()
    };
    let result = FdModeSolver::default().solve(&config).unwrap();
    let fd = result.modes[0].n_eff;
    let exact = slab_te_modes(config.wavelength, config.n_core, config.n_clad, 0.22)[0];

    eprintln!("slab: FD n_eff = {fd:.4}, analytic n_eff = {exact:.4}");

    // The finite window adds Dirichlet confinement along x and the
    // staircase quantises the thickness, both of which only reduce n_eff.
    assert!(fd < exact, "FD slab n_eff {fd} should stay below analytic {exact}");
    assert!(
        exact - fd < 0.25,
        "FD slab n_eff {fd} strays too far from analytic {exact}"
    );
}

#[test]
fn test_mode_count_beyond_grid_points_fails_before_solving() {
    let config = WaveguideConfig {
        domain_size: 2.0,
        resolution: 2, // 4×4 grid, 16 points
        num_modes: 17,
        ..Default::default()
    };
    let result = FdModeSolver::default().solve(&config);
    assert!(matches!(
        result,
        Err(SolverError::InvalidConfiguration(_))
    ));
}
