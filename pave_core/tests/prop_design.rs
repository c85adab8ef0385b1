//! Property-based tests for the pavement design engine using proptest.
//!
//! Covers: solver non-negativity, residual and root choice, monotonicity of SN in traffic
//! and subgrade modulus, layer allocation balance, reliability fallback.

use pave_core::calculations::design::{calculate, PavementDesignInput};
use pave_core::calculations::layers::{allocate_layers, DrainageCoefficients, LayerCoefficients};
use pave_core::calculations::structural_number::{solve, SolverInput, SolverSettings, Termination};
use pave_core::reliability::{zr_for, ReliabilityLevel, FALLBACK_ZR};
use pave_core::settings::DesignSettings;
use proptest::prelude::*;

fn reliability_level() -> impl Strategy<Value = ReliabilityLevel> {
    (0usize..ReliabilityLevel::ALL.len()).prop_map(|i| ReliabilityLevel::ALL[i])
}

// ── Structural Number Solver ─────────────────────────────────────────

proptest! {
    /// Inside the accepted ranges the solver finds a root, and it is the
    /// largest one: every thicker section carries the design traffic.
    #[test]
    fn solver_finds_largest_root(
        w18_exp in 3.0f64..8.0,
        level in reliability_level(),
        so in 0.30f64..0.50,
        delta_psi in prop_oneof![1.0e-6f64..3.5, (-6.0f64..0.0).prop_map(|e| 10f64.powf(e))],
        mr in 1_000.0f64..30_000.0,
    ) {
        let input = SolverInput::new(10f64.powf(w18_exp), level.z_r(), so, delta_psi, mr);
        let outcome = solve(&input, &SolverSettings::default()).unwrap();

        prop_assert!(matches!(outcome.termination, Termination::Converged | Termination::Bracketed),
            "{:?}", outcome.termination);
        prop_assert!(outcome.structural_number >= 0.0);
        prop_assert!(outcome.residual.abs() < 1e-4,
            "residual {} at SN {}", outcome.residual, outcome.structural_number);
        for step in 1..=200 {
            let sn = outcome.structural_number + 0.05 * step as f64;
            prop_assert!(input.residual(sn) > 0.0, "f({}) <= 0 above SN {}", sn, outcome.structural_number);
        }
    }

    /// Any positive, finite input gives a finite SN >= 0.
    #[test]
    fn solver_never_negative(
        w18_exp in 0.0f64..9.0,
        zr in -3.5f64..0.0,
        so in 0.01f64..0.99,
        delta_psi in 0.1f64..4.5,
        mr in 100.0f64..100_000.0,
    ) {
        let input = SolverInput::new(10f64.powf(w18_exp), zr, so, delta_psi, mr);
        if let Ok(outcome) = solve(&input, &SolverSettings::default()) {
            prop_assert!(outcome.structural_number >= 0.0);
            prop_assert!(outcome.structural_number.is_finite());
        }
    }

    /// More traffic never needs less structure.
    #[test]
    fn sn_monotone_in_w18(
        w18_exp in 3.0f64..7.9,
        step in 0.01f64..1.0,
        so in 0.30f64..0.50,
        mr in 1_000.0f64..30_000.0,
    ) {
        let settings = SolverSettings::default();
        let low = solve(&SolverInput::new(10f64.powf(w18_exp), -1.282, so, 1.7, mr), &settings).unwrap();
        let high = solve(&SolverInput::new(10f64.powf(w18_exp + step), -1.282, so, 1.7, mr), &settings).unwrap();
        prop_assert!(high.structural_number >= low.structural_number - 1e-9);
    }

    /// A stiffer subgrade never needs more structure.
    #[test]
    fn sn_antitone_in_mr(
        w18_exp in 3.0f64..8.0,
        mr in 1_000.0f64..29_000.0,
        step in 10.0f64..1_000.0,
    ) {
        let settings = SolverSettings::default();
        let soft = solve(&SolverInput::new(10f64.powf(w18_exp), -1.645, 0.45, 1.7, mr), &settings).unwrap();
        let stiff = solve(&SolverInput::new(10f64.powf(w18_exp), -1.645, 0.45, 1.7, mr + step), &settings).unwrap();
        prop_assert!(stiff.structural_number <= soft.structural_number + 1e-9);
    }
}

// ── Layer Allocation ─────────────────────────────────────────────────

proptest! {
    /// The allocated section carries exactly SN when the subbase is used,
    /// and at least SN otherwise.
    #[test]
    fn allocation_balances(
        sn in 0.0f64..20.0,
        a1 in 0.20f64..0.50,
        a2 in 0.05f64..0.20,
        a3 in 0.05f64..0.15,
        m2 in 0.8f64..1.2,
        m3 in 0.8f64..1.2,
    ) {
        let t = allocate_layers(sn, a1, a2, a3, m2, m3);
        prop_assert!(t.d1 >= 0.0 && t.d2 >= 0.0 && t.d3 >= 0.0);
        prop_assert_eq!(t.d1, 3.0);

        let provided = a1 * t.d1 + a2 * t.d2 * m2 + a3 * t.d3 * m3;
        if t.d3 > 0.0 {
            prop_assert_eq!(t.d2, 6.0);
            prop_assert!((provided - sn).abs() < 1e-9, "provided {} vs required {}", provided, sn);
        } else if t.d2 > 0.0 {
            prop_assert_eq!(t.d2, 6.0);
            prop_assert!(a1 * t.d1 + a2 * t.d2 * m2 >= sn - 1e-12);
        } else {
            prop_assert!(a1 * t.d1 >= sn);
        }
    }

    /// Contributions agree with the thicknesses they came from.
    #[test]
    fn contributions_sum_to_total(
        sn in 0.0f64..15.0,
        m3 in 0.8f64..1.2,
    ) {
        let coefficients = LayerCoefficients::typical();
        let drainage = DrainageCoefficients::new(1.0, m3);
        let t = allocate_layers(sn, coefficients.a1, coefficients.a2, coefficients.a3, 1.0, m3);
        let c = t.contributions(&coefficients, &drainage);
        prop_assert!((c.sn1 + c.sn2 + c.sn3 - c.total).abs() < 1e-12);
        prop_assert!(c.total >= sn - 1e-9);
    }
}

// ── Design Pipeline ──────────────────────────────────────────────────

proptest! {
    /// Every valid form input produces an adequate section.
    #[test]
    fn design_is_adequate(
        w18_exp in 3.0f64..8.0,
        level in reliability_level(),
        so in 0.30f64..0.50,
        p0 in 3.0f64..5.0,
        pt in 1.5f64..3.0,
        mr in 1_000.0f64..30_000.0,
    ) {
        prop_assume!(p0 > pt);
        let input = PavementDesignInput {
            w18: 10f64.powf(w18_exp),
            reliability: level,
            standard_error: so,
            initial_psi: p0,
            terminal_psi: pt,
            subgrade_mr_psi: mr,
            ..PavementDesignInput::default()
        };
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        prop_assert!(result.solver.converged());
        prop_assert!(result.solver.residual.abs() < 1e-4);
        prop_assert!(result.is_adequate());
        prop_assert!((result.delta_psi - (p0 - pt)).abs() < 1e-12);
    }
}

// ── Reliability Lookup ───────────────────────────────────────────────

proptest! {
    /// Percentages away from the table fall back to the 95 % deviate.
    #[test]
    fn untabulated_reliability_falls_back(percent in -1_000.0f64..1_000.0) {
        prop_assume!(ReliabilityLevel::from_percent(percent).is_none());
        prop_assert_eq!(zr_for(percent), FALLBACK_ZR);
    }
}
