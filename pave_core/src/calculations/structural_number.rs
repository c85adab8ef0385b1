//! # Structural Number Solver
//!
//! Inverts the AASHTO 1993 flexible design equation for the required
//! structural number SN using Newton-Raphson iteration with the closed-form
//! derivative from [`crate::equations::aashto`].
//!
//! ## Algorithm
//!
//! Starting from SN = 3.0:
//!
//! 1. An iterate at or below zero is replaced by the 0.01 floor before the
//!    equation is evaluated (log10(SN+1) and the (SN+1)^5.19 term need SN > -1).
//! 2. SN_next = SN - f(SN)/f'(SN). If |f'| < 1e-10 the current estimate is
//!    returned.
//! 3. Stop when |SN_next - SN| < 1e-6.
//! 4. If the iterate is pinned at the floor and the step lands on or below it
//!    again, the root lies below the floor and the step is returned.
//! 5. Otherwise clamp SN_next to the floor and repeat, at most 100 times.
//!
//! ## Bracketing safeguard
//!
//! For small serviceability losses f(SN) is not monotone: it can dip below
//! zero again past a first root, and Newton may stall on the dip or settle on
//! a root that is not the design value. The design SN is the largest root,
//! above which every SN carries the design traffic.
//!
//! f'(SN) > 0 for every SN past [`SCAN_START_SN`] whatever ΔPSI is, so after
//! Newton stops the solver scans downward from there on a geometric grid. If
//! f goes negative above the Newton result (or Newton did not converge), the
//! last sign change is bisected to the step tolerance and reported as
//! [`Termination::Bracketed`].
//!
//! Every path returns SN >= 0. Running out of iterations is not an error: the
//! last estimate is returned and [`SolverOutcome::termination`] says why the
//! iteration stopped.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::structural_number::solve_structural_number;
//!
//! // 1 million ESALs, 90 % reliability, So = 0.45, ΔPSI = 1.7, M_R = 10,000 psi
//! let sn = solve_structural_number(1.0e6, -1.282, 0.45, 1.7, 10_000.0).unwrap();
//! assert!((sn - 3.112).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::aashto::{design_equation_derivative, design_equation_residual};
use crate::errors::{CalcError, CalcResult};

pub use crate::settings::SolverSettings;

/// Start of the downward root scan; f is strictly increasing above it.
pub const SCAN_START_SN: f64 = 32.0;

/// Largest SN searched for a positive residual before giving up.
const MAX_SCAN_SN: f64 = 1.0e12;

/// Ratio between neighbouring (SN + 1) grid points in the scan.
const SCAN_RATIO: f64 = 1.02;

/// Gap above a Newton root below which the scan does not look.
const ROOT_CLEARANCE: f64 = 1.0e-3;

const MAX_BISECTION_STEPS: u32 = 200;

/// Inputs to the design equation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "w18": 1000000.0,
///   "zr": -1.282,
///   "so": 0.45,
///   "delta_psi": 1.7,
///   "mr_psi": 10000.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverInput {
    /// Design traffic, 18-kip ESALs
    pub w18: f64,

    /// Standard normal deviate for the design reliability (≤ 0 for R ≥ 50 %)
    pub zr: f64,

    /// Combined standard error
    pub so: f64,

    /// Serviceability loss p_o - p_t
    pub delta_psi: f64,

    /// Subgrade resilient modulus (psi)
    pub mr_psi: f64,
}

impl SolverInput {
    pub fn new(w18: f64, zr: f64, so: f64, delta_psi: f64, mr_psi: f64) -> Self {
        SolverInput {
            w18,
            zr,
            so,
            delta_psi,
            mr_psi,
        }
    }

    /// Reject values for which the design equation is undefined.
    ///
    /// W18, ΔPSI and M_R appear inside logarithms and must be positive; every
    /// value must be finite. Form ranges (e.g. M_R ≤ 30,000 psi) are not
    /// checked here; see [`crate::calculations::design`].
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("w18", self.w18),
            ("zr", self.zr),
            ("so", self.so),
            ("delta_psi", self.delta_psi),
            ("mr_psi", self.mr_psi),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"));
            }
        }
        if self.w18 <= 0.0 {
            return Err(CalcError::invalid_input(
                "w18",
                self.w18.to_string(),
                "Design traffic must be positive",
            ));
        }
        if self.delta_psi <= 0.0 {
            return Err(CalcError::invalid_input(
                "delta_psi",
                self.delta_psi.to_string(),
                "Serviceability loss must be positive",
            ));
        }
        if self.mr_psi <= 0.0 {
            return Err(CalcError::invalid_input(
                "mr_psi",
                self.mr_psi.to_string(),
                "Resilient modulus must be positive",
            ));
        }
        Ok(())
    }

    /// Design equation residual f(SN) for these inputs
    pub fn residual(&self, sn: f64) -> f64 {
        design_equation_residual(sn, self.w18, self.zr, self.so, self.delta_psi, self.mr_psi)
    }

    /// Derivative f'(SN) for these inputs
    pub fn derivative(&self, sn: f64) -> f64 {
        design_equation_derivative(sn, self.delta_psi)
    }
}

/// Why the iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Successive iterates agreed within tolerance
    Converged,
    /// The root lies below the iterate floor; the (non-negative) step is returned
    RootBelowFloor,
    /// Newton stalled or found a lower root; the largest root was bisected
    Bracketed,
    /// |f'(SN)| fell below the derivative threshold
    DerivativeVanished,
    /// The iteration cap was reached
    IterationLimit,
}

impl Termination {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Termination::Converged => "Converged",
            Termination::RootBelowFloor => "Root below floor (SN clamped)",
            Termination::Bracketed => "Converged (bisection)",
            Termination::DerivativeVanished => "Derivative vanished",
            Termination::IterationLimit => "Iteration limit reached",
        }
    }
}

/// Solver result with diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOutcome {
    /// Required structural number, always ≥ 0
    pub structural_number: f64,

    /// Newton steps plus bisection steps taken
    pub iterations: u32,

    /// f(SN) at the returned structural number
    pub residual: f64,

    /// Why the iteration stopped
    pub termination: Termination,
}

impl SolverOutcome {
    /// True when the returned SN solves the design equation (or the root
    /// lies below zero and SN is clamped).
    pub fn converged(&self) -> bool {
        matches!(
            self.termination,
            Termination::Converged | Termination::Bracketed | Termination::RootBelowFloor
        )
    }
}

/// Solve the design equation for SN with explicit settings.
///
/// # Errors
///
/// `InvalidInput` when the inputs are outside the equation's domain (see
/// [`SolverInput::validate`]) or the settings are invalid. Non-convergence
/// (no positive residual below the scan limit) is reported through
/// [`SolverOutcome::termination`], not as an error.
///
/// # Example
///
/// ```rust
/// use pave_core::calculations::structural_number::{solve, SolverInput, SolverSettings, Termination};
///
/// let input = SolverInput::new(1.0e7, -1.282, 0.45, 1.7, 10_000.0);
/// let outcome = solve(&input, &SolverSettings::default()).unwrap();
/// assert_eq!(outcome.termination, Termination::Converged);
/// assert!(outcome.residual.abs() < 1e-4);
/// ```
pub fn solve(input: &SolverInput, settings: &SolverSettings) -> CalcResult<SolverOutcome> {
    input.validate()?;
    settings.validate()?;

    let newton = newton_raphson(input, settings)?;
    let structural_number = newton.structural_number.max(0.0);
    let outcome = SolverOutcome {
        structural_number,
        iterations: newton.iterations,
        residual: input.residual(structural_number),
        termination: newton.termination,
    };
    Ok(bracket_largest_root(input, settings, outcome).unwrap_or(outcome))
}

struct NewtonResult {
    structural_number: f64,
    iterations: u32,
    termination: Termination,
}

fn newton_raphson(input: &SolverInput, settings: &SolverSettings) -> CalcResult<NewtonResult> {
    let floor = settings.min_iterate;
    let stop = |sn: f64, iterations: u32, termination: Termination| NewtonResult {
        structural_number: sn,
        iterations,
        termination,
    };

    let mut sn = settings.initial_sn;
    for iteration in 1..=settings.max_iterations {
        let current = if sn <= 0.0 { floor } else { sn };

        let slope = input.derivative(current);
        if slope.abs() < settings.derivative_threshold {
            return Ok(stop(current, iteration, Termination::DerivativeVanished));
        }

        let next = current - input.residual(current) / slope;
        if !next.is_finite() {
            return Err(CalcError::calculation_failed(
                "structural_number",
                format!("Newton step became non-finite at SN = {}", current),
            ));
        }

        if (next - current).abs() < settings.tolerance {
            return Ok(stop(next, iteration, Termination::Converged));
        }

        if current <= floor && next <= floor {
            return Ok(stop(next, iteration, Termination::RootBelowFloor));
        }

        sn = next.max(floor);
    }

    Ok(stop(sn, settings.max_iterations, Termination::IterationLimit))
}

/// Replace the Newton outcome with the largest root when one lies above it.
///
/// Returns `None` when the Newton outcome stands: no negative residual above
/// a converged root, or no positive residual anywhere up to [`MAX_SCAN_SN`].
fn bracket_largest_root(input: &SolverInput, settings: &SolverSettings, newton: SolverOutcome) -> Option<SolverOutcome> {
    let floor = settings.min_iterate;
    let accepted = newton.converged();
    let lower = if accepted {
        newton.structural_number + ROOT_CLEARANCE
    } else {
        floor
    };

    let mut upper = SCAN_START_SN.max(lower);
    while input.residual(upper) <= 0.0 {
        upper *= 2.0;
        if upper > MAX_SCAN_SN {
            return None;
        }
    }

    // Walk down until the residual turns negative: (below, upper) brackets the last crossing.
    let below = loop {
        let next = (upper + 1.0) / SCAN_RATIO - 1.0;
        if next <= lower {
            if input.residual(lower) < 0.0 {
                break lower;
            }
            if accepted {
                return None;
            }
            return Some(SolverOutcome {
                structural_number: 0.0,
                iterations: newton.iterations,
                residual: input.residual(0.0),
                termination: Termination::RootBelowFloor,
            });
        }
        if input.residual(next) < 0.0 {
            break next;
        }
        upper = next;
    };

    let mut low = below;
    let mut steps = 0;
    while upper - low >= settings.tolerance && steps < MAX_BISECTION_STEPS {
        let mid = 0.5 * (low + upper);
        if input.residual(mid) < 0.0 {
            low = mid;
        } else {
            upper = mid;
        }
        steps += 1;
    }

    Some(SolverOutcome {
        structural_number: upper,
        iterations: newton.iterations + steps,
        residual: input.residual(upper),
        termination: Termination::Bracketed,
    })
}

/// Required structural number with default solver settings.
///
/// # Arguments
/// * `w18` - Design traffic, 18-kip ESALs
/// * `zr` - Standard normal deviate
/// * `so` - Combined standard error
/// * `delta_psi` - Serviceability loss
/// * `mr_psi` - Subgrade resilient modulus (psi)
///
/// # Returns
/// SN ≥ 0
pub fn solve_structural_number(w18: f64, zr: f64, so: f64, delta_psi: f64, mr_psi: f64) -> CalcResult<f64> {
    let input = SolverInput::new(w18, zr, so, delta_psi, mr_psi);
    solve(&input, &SolverSettings::default()).map(|outcome| outcome.structural_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_input() -> SolverInput {
        SolverInput::new(1.0e6, -1.282, 0.45, 1.7, 10_000.0)
    }

    #[test]
    fn test_reference_design() {
        let outcome = solve(&reference_input(), &SolverSettings::default()).unwrap();
        assert_eq!(outcome.termination, Termination::Converged);
        assert!((outcome.structural_number - 3.1122).abs() < 1e-3);
        assert!(outcome.residual.abs() < 1e-6);
        assert!(outcome.iterations <= 10);
    }

    #[test]
    fn test_known_solutions() {
        let cases = [
            (1.0e7, -1.282, 0.45, 1.7, 10_000.0, 4.4964),
            (1.0e5, -1.282, 0.45, 1.7, 10_000.0, 2.1209),
            (1.0e6, -1.282, 0.45, 1.7, 20_000.0, 2.3825),
            (5.0e6, -1.645, 0.45, 1.7, 5_000.0, 5.4134),
            (1.0e8, -3.090, 0.50, 1.5, 1_000.0, 15.8976),
        ];
        for (w18, zr, so, dpsi, mr, expected) in cases {
            let sn = solve_structural_number(w18, zr, so, dpsi, mr).unwrap();
            assert!(
                (sn - expected).abs() < 1e-3,
                "W18={}, MR={}: SN {} vs {}",
                w18,
                mr,
                sn,
                expected
            );
        }
    }

    #[test]
    fn test_light_traffic_small_sn() {
        let sn = solve_structural_number(1.0e3, 0.0, 0.30, 1.7, 30_000.0).unwrap();
        assert!((sn - 0.2428).abs() < 1e-3);
    }

    #[test]
    fn test_root_below_floor_clamps_to_zero() {
        let input = SolverInput::new(10.0, 0.0, 0.45, 1.7, 30_000.0);
        let outcome = solve(&input, &SolverSettings::default()).unwrap();
        assert_eq!(outcome.termination, Termination::RootBelowFloor);
        assert_eq!(outcome.structural_number, 0.0);
    }

    #[test]
    fn test_iteration_limit_falls_back_to_bisection() {
        let settings = SolverSettings {
            max_iterations: 1,
            ..SolverSettings::default()
        };
        let input = SolverInput::new(1.0e8, -3.090, 0.50, 1.5, 1_000.0);
        let outcome = solve(&input, &settings).unwrap();
        assert_eq!(outcome.termination, Termination::Bracketed);
        assert!(outcome.iterations > 1);
        assert!(outcome.converged());
        assert!((outcome.structural_number - 15.8976).abs() < 1e-3);
    }

    #[test]
    fn test_derivative_threshold_falls_back_to_bisection() {
        let settings = SolverSettings {
            derivative_threshold: 1.0e6,
            ..SolverSettings::default()
        };
        let outcome = solve(&reference_input(), &settings).unwrap();
        assert_eq!(outcome.termination, Termination::Bracketed);
        assert!((outcome.structural_number - 3.1122).abs() < 1e-3);
    }

    #[test]
    fn test_small_serviceability_loss() {
        // ΔPSI = 0.1 (p0 = 3.1, pt = 3.0): Newton stalls on the dip in f.
        let cases = [
            (1.0e6, -3.090, 0.50, 10_000.0, 10.9632),
            (1.0e4, -1.282, 0.30, 1_000.0, 8.6066),
            (1.0e6, -1.282, 0.45, 10_000.0, 8.2756),
        ];
        for (w18, zr, so, mr, expected) in cases {
            let outcome = solve(&SolverInput::new(w18, zr, so, 0.1, mr), &SolverSettings::default()).unwrap();
            assert!(outcome.converged());
            assert!(
                (outcome.structural_number - expected).abs() < 1e-3,
                "W18={}: SN {} vs {}",
                w18,
                outcome.structural_number,
                expected
            );
            assert!(outcome.residual.abs() < 1e-4);
        }
    }

    #[test]
    fn test_lower_newton_root_is_replaced_by_largest_root() {
        // Three roots near 1.8, 4.1 and 5.5; Newton from 3.0 settles on 4.1.
        let input = SolverInput::new(1.0e6, 0.0, 0.30, 0.05, 30_000.0);
        let outcome = solve(&input, &SolverSettings::default()).unwrap();
        assert_eq!(outcome.termination, Termination::Bracketed);
        assert!((outcome.structural_number - 5.4562).abs() < 1e-3);
        for step in 1..=100 {
            let sn = outcome.structural_number + 0.01 * step as f64;
            assert!(input.residual(sn) > 0.0, "f({}) <= 0", sn);
        }
    }

    #[test]
    fn test_unreachable_traffic_is_not_converged() {
        // No SN below the scan limit carries 1e300 ESALs.
        let input = SolverInput::new(1.0e300, -1.282, 0.45, 1.7, 10_000.0);
        let outcome = solve(&input, &SolverSettings::default()).unwrap();
        assert_eq!(outcome.termination, Termination::DerivativeVanished);
        assert!(!outcome.converged());
        assert!(outcome.structural_number >= 0.0);
    }

    #[test]
    fn test_negative_seed_uses_floor() {
        let settings = SolverSettings {
            initial_sn: 0.0,
            ..SolverSettings::default()
        };
        let outcome = solve(&reference_input(), &settings).unwrap();
        assert!(outcome.converged());
        assert!((outcome.structural_number - 3.1122).abs() < 1e-3);
    }

    #[test]
    fn test_domain_errors() {
        let cases = [
            (SolverInput { w18: 0.0, ..reference_input() }, "w18"),
            (SolverInput { w18: -5.0, ..reference_input() }, "w18"),
            (SolverInput { delta_psi: 0.0, ..reference_input() }, "delta_psi"),
            (SolverInput { mr_psi: -1.0, ..reference_input() }, "mr_psi"),
            (SolverInput { so: f64::NAN, ..reference_input() }, "so"),
            (SolverInput { zr: f64::NEG_INFINITY, ..reference_input() }, "zr"),
        ];
        for (input, field) in cases {
            let err = solve(&input, &SolverSettings::default()).unwrap_err();
            assert_eq!(err.field(), Some(field));
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_more_traffic_needs_more_structure() {
        let mut previous = 0.0;
        for w18 in [1.0e3, 1.0e4, 1.0e5, 1.0e6, 1.0e7, 1.0e8] {
            let sn = solve_structural_number(w18, -1.282, 0.45, 1.7, 10_000.0).unwrap();
            assert!(sn >= previous);
            previous = sn;
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = solve(&reference_input(), &SolverSettings::default()).unwrap();
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"termination\":\"Converged\""));
        let parsed: SolverOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.termination, outcome.termination);
    }
}
