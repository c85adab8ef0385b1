//! # Design Settings
//!
//! Configuration for a design run: solver tolerances, minimum layer
//! thicknesses, and the accepted input ranges. Every field has a default
//! matching common AASHTO 1993 practice, so an empty JSON object is a valid
//! settings file.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "solver": { "initial_sn": 3.0, "tolerance": 1e-6, "max_iterations": 100 },
//!   "minimums": { "asphalt_in": 3.0, "base_in": 6.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Top-level settings for a pavement design run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Newton-Raphson solver configuration
    pub solver: SolverSettings,

    /// Minimum thicknesses for the asphalt and base layers
    pub minimums: LayerMinimums,

    /// Accepted ranges for design inputs
    pub limits: InputLimits,
}

impl DesignSettings {
    /// Validate all nested settings.
    pub fn validate(&self) -> CalcResult<()> {
        self.solver.validate()?;
        self.minimums.validate()?;
        self.limits.validate()
    }
}

/// Newton-Raphson solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Starting structural number
    pub initial_sn: f64,

    /// Stop when successive iterates differ by less than this
    pub tolerance: f64,

    /// Iteration cap; the last iterate is returned when it is reached
    pub max_iterations: u32,

    /// Iterates are clamped to at least this value before evaluation
    pub min_iterate: f64,

    /// A derivative smaller than this in magnitude stops the iteration
    pub derivative_threshold: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            initial_sn: 3.0,
            tolerance: 1e-6,
            max_iterations: 100,
            min_iterate: 0.01,
            derivative_threshold: 1e-10,
        }
    }
}

impl SolverSettings {
    /// Validate solver configuration.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.initial_sn.is_finite() && self.initial_sn >= 0.0) {
            return Err(CalcError::invalid_input(
                "solver.initial_sn",
                self.initial_sn.to_string(),
                "Initial structural number must be finite and non-negative",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(CalcError::invalid_input(
                "solver.tolerance",
                self.tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "solver.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        if !(self.min_iterate.is_finite() && self.min_iterate > 0.0) {
            return Err(CalcError::invalid_input(
                "solver.min_iterate",
                self.min_iterate.to_string(),
                "Iterate floor must be positive (log10(SN+1) needs SN > -1)",
            ));
        }
        if !(self.derivative_threshold.is_finite() && self.derivative_threshold >= 0.0) {
            return Err(CalcError::invalid_input(
                "solver.derivative_threshold",
                self.derivative_threshold.to_string(),
                "Derivative threshold must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Minimum thicknesses assigned to the asphalt and base layers (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerMinimums {
    /// Minimum asphalt concrete thickness D1 (in)
    pub asphalt_in: f64,

    /// Minimum base course thickness D2 (in)
    pub base_in: f64,
}

impl Default for LayerMinimums {
    fn default() -> Self {
        LayerMinimums {
            asphalt_in: 3.0,
            base_in: 6.0,
        }
    }
}

impl LayerMinimums {
    /// Validate minimum thicknesses.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("minimums.asphalt_in", self.asphalt_in), ("minimums.base_in", self.base_in)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Minimum thickness must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Closed interval `[min, max]` for a design input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    /// True if `value` lies inside the interval (NaN is never inside)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check `value` against the interval, naming `field` on failure.
    pub fn check(&self, field: &str, value: f64) -> CalcResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(CalcError::invalid_input(
                field,
                value.to_string(),
                format!("Must be between {} and {}", self.min, self.max),
            ))
        }
    }
}

/// Accepted ranges for the design inputs.
///
/// Defaults are the ranges of the usual design form: W18 1e3..1e8, So
/// 0.30..0.50, p_o 3.0..5.0, p_t 1.5..3.0, M_R 1,000..30,000 psi, layer
/// coefficients a1 0.20..0.50, a2 0.05..0.20, a3 0.05..0.15, drainage
/// 0.8..1.2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub w18: Range,
    pub standard_error: Range,
    pub initial_psi: Range,
    pub terminal_psi: Range,
    pub subgrade_mr_psi: Range,
    pub a1: Range,
    pub a2: Range,
    pub a3: Range,
    pub drainage: Range,
}

impl Default for InputLimits {
    fn default() -> Self {
        InputLimits {
            w18: Range::new(1.0e3, 1.0e8),
            standard_error: Range::new(0.30, 0.50),
            initial_psi: Range::new(3.0, 5.0),
            terminal_psi: Range::new(1.5, 3.0),
            subgrade_mr_psi: Range::new(1.0e3, 3.0e4),
            a1: Range::new(0.20, 0.50),
            a2: Range::new(0.05, 0.20),
            a3: Range::new(0.05, 0.15),
            drainage: Range::new(0.8, 1.2),
        }
    }
}

impl InputLimits {
    /// Every range must be finite with min <= max.
    pub fn validate(&self) -> CalcResult<()> {
        let ranges = [
            ("limits.w18", self.w18),
            ("limits.standard_error", self.standard_error),
            ("limits.initial_psi", self.initial_psi),
            ("limits.terminal_psi", self.terminal_psi),
            ("limits.subgrade_mr_psi", self.subgrade_mr_psi),
            ("limits.a1", self.a1),
            ("limits.a2", self.a2),
            ("limits.a3", self.a3),
            ("limits.drainage", self.drainage),
        ];
        for (field, range) in ranges {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(CalcError::invalid_input(
                    field,
                    format!("[{}, {}]", range.min, range.max),
                    "Range bounds must be finite with min <= max",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DesignSettings::default();
        assert_eq!(settings.solver.initial_sn, 3.0);
        assert_eq!(settings.solver.tolerance, 1e-6);
        assert_eq!(settings.solver.max_iterations, 100);
        assert_eq!(settings.solver.min_iterate, 0.01);
        assert_eq!(settings.minimums.asphalt_in, 3.0);
        assert_eq!(settings.minimums.base_in, 6.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings: DesignSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, DesignSettings::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let settings: DesignSettings =
            serde_json::from_str(r#"{ "minimums": { "base_in": 8.0 }, "solver": { "max_iterations": 20 } }"#)
                .unwrap();
        assert_eq!(settings.minimums.base_in, 8.0);
        assert_eq!(settings.minimums.asphalt_in, 3.0);
        assert_eq!(settings.solver.max_iterations, 20);
        assert_eq!(settings.solver.tolerance, 1e-6);
    }

    #[test]
    fn test_invalid_solver_settings() {
        let mut solver = SolverSettings::default();
        solver.tolerance = 0.0;
        assert!(solver.validate().is_err());

        let mut solver = SolverSettings::default();
        solver.max_iterations = 0;
        assert!(solver.validate().is_err());

        let mut solver = SolverSettings::default();
        solver.min_iterate = -1.0;
        assert!(solver.validate().is_err());
    }

    #[test]
    fn test_invalid_minimums() {
        let minimums = LayerMinimums { asphalt_in: 0.0, base_in: 6.0 };
        let err = minimums.validate().unwrap_err();
        assert_eq!(err.field(), Some("minimums.asphalt_in"));
    }

    #[test]
    fn test_range_check() {
        let range = Range::new(0.30, 0.50);
        assert!(range.check("so", 0.45).is_ok());
        assert!(range.check("so", 0.30).is_ok());
        assert!(range.check("so", 0.50).is_ok());
        assert!(range.check("so", 0.51).is_err());
        assert!(range.check("so", f64::NAN).is_err());
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let mut limits = InputLimits::default();
        limits.a3 = Range::new(0.2, 0.1);
        assert_eq!(limits.validate().unwrap_err().field(), Some("limits.a3"));
    }
}
