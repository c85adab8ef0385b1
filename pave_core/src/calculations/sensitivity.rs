//! # Sensitivity Analysis
//!
//! Sweeps one design parameter and records the required structural number at
//! each value, holding every other input fixed.
//!
//! | Parameter | Values |
//! |-----------|--------|
//! | W18 | log-spaced from 0.5·W18 to 2·W18 |
//! | M_R | evenly spaced from 0.5·M_R to 1.5·M_R |
//! | Reliability | 50, 60, 70, 75, 80, 85, 90, 95, 99 % |
//!
//! The base design is validated against the accepted ranges like any other
//! design. Swept values may then leave those ranges, so range validation is
//! skipped for the swept parameter only. The design equation must still be
//! defined at every point.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::design::PavementDesignInput;
//! use pave_core::calculations::sensitivity::{sweep_w18, DEFAULT_SWEEP_POINTS};
//! use pave_core::settings::DesignSettings;
//!
//! let curve = sweep_w18(&PavementDesignInput::default(), &DesignSettings::default(), DEFAULT_SWEEP_POINTS).unwrap();
//! assert_eq!(curve.points.len(), 20);
//! assert!(curve.points[0].structural_number < curve.points[19].structural_number);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::design::{evaluate, PavementDesignInput};
use crate::errors::{CalcError, CalcResult};
use crate::reliability::ReliabilityLevel;
use crate::settings::DesignSettings;

/// Number of points in a W18 or M_R sweep unless the caller asks otherwise
pub const DEFAULT_SWEEP_POINTS: usize = 20;

/// Parameter varied in a sensitivity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityParameter {
    W18,
    SubgradeModulus,
    Reliability,
}

impl SensitivityParameter {
    pub const ALL: [SensitivityParameter; 3] = [
        SensitivityParameter::W18,
        SensitivityParameter::SubgradeModulus,
        SensitivityParameter::Reliability,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "w18" | "esal" | "esals" | "traffic" => Ok(SensitivityParameter::W18),
            "mr" | "m_r" | "subgrade" | "resilient_modulus" => Ok(SensitivityParameter::SubgradeModulus),
            "r" | "reliability" => Ok(SensitivityParameter::Reliability),
            _ => Err(CalcError::invalid_input(
                "sensitivity",
                s,
                "Expected one of: w18, mr, reliability",
            )),
        }
    }

    /// Axis label for tables and reports
    pub fn axis_label(&self) -> &'static str {
        match self {
            SensitivityParameter::W18 => "W18 (ESAL)",
            SensitivityParameter::SubgradeModulus => "Resilient Modulus (psi)",
            SensitivityParameter::Reliability => "Reliability (%)",
        }
    }
}

impl std::fmt::Display for SensitivityParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SensitivityParameter::W18 => "W18",
            SensitivityParameter::SubgradeModulus => "MR",
            SensitivityParameter::Reliability => "Reliability",
        };
        write!(f, "{}", name)
    }
}

/// One point on a sensitivity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Value of the swept parameter
    pub value: f64,
    /// Required structural number at that value
    pub structural_number: f64,
}

/// Required SN as a function of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCurve {
    pub parameter: SensitivityParameter,
    pub points: Vec<SensitivityPoint>,
}

impl SensitivityCurve {
    /// Smallest and largest SN on the curve
    pub fn sn_range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|p| p.structural_number);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), sn| (lo.min(sn), hi.max(sn))))
    }
}

/// Sweep W18 over `points` log-spaced values from 0.5·W18 to 2·W18.
///
/// # Errors
///
/// `InvalidInput` when the base design is outside the accepted ranges; only
/// the swept values may leave them.
pub fn sweep_w18(
    input: &PavementDesignInput,
    settings: &DesignSettings,
    points: usize,
) -> CalcResult<SensitivityCurve> {
    check_base_design(input, settings)?;
    check_point_count(points)?;
    let (lo, hi) = ((0.5 * input.w18).log10(), (2.0 * input.w18).log10());
    let values = spaced(lo, hi, points).map(|exponent| 10f64.powf(exponent));
    sweep(SensitivityParameter::W18, values, settings, |w18| PavementDesignInput {
        w18,
        ..input.clone()
    })
}

/// Sweep M_R over `points` evenly spaced values from 0.5·M_R to 1.5·M_R.
pub fn sweep_mr(
    input: &PavementDesignInput,
    settings: &DesignSettings,
    points: usize,
) -> CalcResult<SensitivityCurve> {
    check_base_design(input, settings)?;
    check_point_count(points)?;
    let values = spaced(0.5 * input.subgrade_mr_psi, 1.5 * input.subgrade_mr_psi, points);
    sweep(SensitivityParameter::SubgradeModulus, values, settings, |subgrade_mr_psi| {
        PavementDesignInput {
            subgrade_mr_psi,
            ..input.clone()
        }
    })
}

/// Sweep reliability over the tabulated levels from 50 % to 99 %.
pub fn sweep_reliability(input: &PavementDesignInput, settings: &DesignSettings) -> CalcResult<SensitivityCurve> {
    check_base_design(input, settings)?;
    let levels = ReliabilityLevel::ALL
        .iter()
        .copied()
        .filter(|level| *level != ReliabilityLevel::R99_9);

    let mut points = Vec::new();
    for reliability in levels {
        let varied = PavementDesignInput {
            reliability,
            ..input.clone()
        };
        points.push(SensitivityPoint {
            value: reliability.percent(),
            structural_number: evaluate(&varied, settings)?.structural_number,
        });
    }
    Ok(SensitivityCurve {
        parameter: SensitivityParameter::Reliability,
        points,
    })
}

/// Run the sweep named by `parameter`; `points` is ignored for reliability.
pub fn sweep_parameter(
    parameter: SensitivityParameter,
    input: &PavementDesignInput,
    settings: &DesignSettings,
    points: usize,
) -> CalcResult<SensitivityCurve> {
    match parameter {
        SensitivityParameter::W18 => sweep_w18(input, settings, points),
        SensitivityParameter::SubgradeModulus => sweep_mr(input, settings, points),
        SensitivityParameter::Reliability => sweep_reliability(input, settings),
    }
}

fn check_base_design(input: &PavementDesignInput, settings: &DesignSettings) -> CalcResult<()> {
    settings.validate()?;
    input.validate(&settings.limits)
}

fn check_point_count(points: usize) -> CalcResult<()> {
    if points < 2 {
        return Err(CalcError::calculation_failed(
            "sensitivity",
            format!("A sweep needs at least 2 points, got {}", points),
        ));
    }
    Ok(())
}

/// `count` evenly spaced values from `start` to `end` inclusive
fn spaced(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = (end - start) / (count - 1) as f64;
    (0..count).map(move |i| if i + 1 == count { end } else { start + step * i as f64 })
}

fn sweep(
    parameter: SensitivityParameter,
    values: impl Iterator<Item = f64>,
    settings: &DesignSettings,
    vary: impl Fn(f64) -> PavementDesignInput,
) -> CalcResult<SensitivityCurve> {
    let mut points = Vec::new();
    for value in values {
        let result = evaluate(&vary(value), settings)?;
        points.push(SensitivityPoint {
            value,
            structural_number: result.structural_number,
        });
    }
    Ok(SensitivityCurve { parameter, points })
}
