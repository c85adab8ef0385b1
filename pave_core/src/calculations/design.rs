//! # Flexible Pavement Design
//!
//! The complete design chain for one set of inputs:
//!
//! 1. Validate inputs against the accepted ranges
//! 2. Z_R from the design reliability
//! 3. ΔPSI = p_o - p_t
//! 4. Required SN from the design equation
//! 5. Layer thicknesses from SN
//! 6. Structural number provided by each layer
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::design::{calculate, PavementDesignInput};
//! use pave_core::settings::DesignSettings;
//!
//! let input = PavementDesignInput::default();
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//!
//! assert!((result.structural_number - 3.112).abs() < 1e-2);
//! assert_eq!(result.thicknesses.d1, 3.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::layers::{
    allocate, DrainageCoefficients, LayerCoefficients, LayerContributions, LayerThicknesses,
};
use crate::calculations::structural_number::{solve, SolverInput, SolverOutcome};
use crate::equations::registry::{Equation, EquationTracker};
use crate::errors::{CalcError, CalcResult};
use crate::reliability::ReliabilityLevel;
use crate::settings::{DesignSettings, InputLimits};

/// Inputs for a flexible pavement design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Route 9 widening",
///   "w18": 1000000.0,
///   "reliability": 90,
///   "standard_error": 0.45,
///   "initial_psi": 4.2,
///   "terminal_psi": 2.5,
///   "subgrade_mr_psi": 10000.0,
///   "coefficients": { "a1": 0.44, "a2": 0.14, "a3": 0.11 },
///   "drainage": { "m2": 1.0, "m3": 1.0 }
/// }
/// ```
///
/// `label`, `coefficients` and `drainage` may be omitted and take their
/// defaults (empty label, typical coefficients, m = 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PavementDesignInput {
    /// User label for this design (e.g., "Route 9 widening")
    #[serde(default)]
    pub label: String,

    /// Design traffic, 18-kip ESALs over the design period
    pub w18: f64,

    /// Design reliability level
    pub reliability: ReliabilityLevel,

    /// Combined standard error S_o
    pub standard_error: f64,

    /// Initial serviceability p_o
    pub initial_psi: f64,

    /// Terminal serviceability p_t
    pub terminal_psi: f64,

    /// Subgrade resilient modulus M_R (psi)
    pub subgrade_mr_psi: f64,

    /// Structural layer coefficients
    #[serde(default)]
    pub coefficients: LayerCoefficients,

    /// Drainage coefficients
    #[serde(default)]
    pub drainage: DrainageCoefficients,
}

impl Default for PavementDesignInput {
    fn default() -> Self {
        PavementDesignInput {
            label: String::new(),
            w18: 1.0e6,
            reliability: ReliabilityLevel::R90,
            standard_error: 0.45,
            initial_psi: 4.2,
            terminal_psi: 2.5,
            subgrade_mr_psi: 10_000.0,
            coefficients: LayerCoefficients::typical(),
            drainage: DrainageCoefficients::default(),
        }
    }
}

impl PavementDesignInput {
    /// Serviceability loss ΔPSI = p_o - p_t
    pub fn delta_psi(&self) -> f64 {
        self.initial_psi - self.terminal_psi
    }

    /// Validate inputs against the accepted ranges.
    pub fn validate(&self, limits: &InputLimits) -> CalcResult<()> {
        limits.w18.check("w18", self.w18)?;
        limits.standard_error.check("standard_error", self.standard_error)?;
        limits.initial_psi.check("initial_psi", self.initial_psi)?;
        limits.terminal_psi.check("terminal_psi", self.terminal_psi)?;
        if self.initial_psi <= self.terminal_psi {
            return Err(CalcError::invalid_input(
                "terminal_psi",
                self.terminal_psi.to_string(),
                format!(
                    "Terminal serviceability must be below initial serviceability ({})",
                    self.initial_psi
                ),
            ));
        }
        limits.subgrade_mr_psi.check("subgrade_mr_psi", self.subgrade_mr_psi)?;
        limits.a1.check("a1", self.coefficients.a1)?;
        limits.a2.check("a2", self.coefficients.a2)?;
        limits.a3.check("a3", self.coefficients.a3)?;
        limits.drainage.check("m2", self.drainage.m2)?;
        limits.drainage.check("m3", self.drainage.m3)?;
        Ok(())
    }

    /// Solver inputs for this design
    pub fn solver_input(&self) -> SolverInput {
        SolverInput::new(
            self.w18,
            self.reliability.z_r(),
            self.standard_error,
            self.delta_psi(),
            self.subgrade_mr_psi,
        )
    }
}

/// Results of a flexible pavement design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PavementDesignResult {
    /// Standard normal deviate used
    pub zr: f64,

    /// Serviceability loss used
    pub delta_psi: f64,

    /// Solver diagnostics
    pub solver: SolverOutcome,

    /// Required structural number (≥ 0)
    pub structural_number: f64,

    /// Allocated thicknesses (in)
    pub thicknesses: LayerThicknesses,

    /// Structural number provided by each layer
    pub contributions: LayerContributions,
}

impl PavementDesignResult {
    /// True if the solver found the required structural number and the
    /// provided section meets it
    pub fn is_adequate(&self) -> bool {
        self.solver.converged() && self.contributions.total >= self.structural_number - 1e-9
    }

    /// Structural number provided beyond the requirement
    pub fn surplus(&self) -> f64 {
        (self.contributions.total - self.structural_number).max(0.0)
    }

    /// Equations applied in producing this result, for report appendices.
    pub fn equations_used(&self, label: &str) -> EquationTracker {
        let mut tracker = EquationTracker::new();
        tracker.record_for_design(Equation::ServiceabilityLoss, "Serviceability loss", label);
        tracker.record_for_design(Equation::ReliabilityDeviate, "Design reliability", label);
        tracker.record_for_design(Equation::FlexibleDesignEquation, "Required structural number", label);
        tracker.record_for_design(Equation::DesignEquationDerivative, "Newton-Raphson slope", label);
        tracker.record_for_design(Equation::NewtonRaphsonUpdate, "Structural number iteration", label);
        tracker.record_for_design(Equation::SurfaceLayerContribution, "Asphalt layer", label);
        if self.thicknesses.d2 > 0.0 {
            tracker.record_for_design(Equation::BaseLayerContribution, "Base layer", label);
        }
        if self.thicknesses.d3 > 0.0 {
            tracker.record_for_design(Equation::SubbaseThickness, "Subbase layer", label);
        }
        tracker.record_for_design(Equation::LayeredStructuralNumber, "Provided structural number", label);
        tracker.record_for_design(Equation::InchToCentimeter, "Metric thicknesses", label);
        tracker
    }
}

/// Run the design chain, validating inputs against `settings.limits`.
///
/// # Errors
///
/// `InvalidInput` naming the first field outside its accepted range, or
/// invalid settings. `CalculationFailed` when the solver finds no root.
pub fn calculate(input: &PavementDesignInput, settings: &DesignSettings) -> CalcResult<PavementDesignResult> {
    settings.validate()?;
    input.validate(&settings.limits)?;
    evaluate(input, settings)
}

/// Run the design chain without the range checks.
///
/// Domain checks still apply: the solver rejects inputs for which the design
/// equation is undefined, and coefficients must be positive. Used by the
/// sensitivity sweeps, which step the swept parameter outside the usual
/// ranges on purpose.
pub(crate) fn evaluate(input: &PavementDesignInput, settings: &DesignSettings) -> CalcResult<PavementDesignResult> {
    input.coefficients.validate()?;
    input.drainage.validate()?;

    let solver_input = input.solver_input();
    let solver = solve(&solver_input, &settings.solver)?;
    if !solver.converged() {
        return Err(CalcError::calculation_failed(
            "structural_number",
            format!(
                "No structural number satisfies the design equation ({} after {} iterations, SN = {:.3})",
                solver.termination.display_name(),
                solver.iterations,
                solver.structural_number
            ),
        ));
    }
    let structural_number = solver.structural_number;

    let thicknesses = allocate(structural_number, &input.coefficients, &input.drainage, &settings.minimums);
    let contributions = thicknesses.contributions(&input.coefficients, &input.drainage);

    Ok(PavementDesignResult {
        zr: solver_input.zr,
        delta_psi: solver_input.delta_psi,
        solver,
        structural_number,
        thicknesses,
        contributions,
    })
}
