//! # Design Reliability
//!
//! Maps a design reliability level R to its standard normal deviate Z_R per
//! AASHTO 1993 Part I, Table 4.1.
//!
//! | R (%) | Z_R    |
//! |-------|--------|
//! | 50    |  0.000 |
//! | 60    | -0.253 |
//! | 70    | -0.524 |
//! | 75    | -0.674 |
//! | 80    | -0.841 |
//! | 85    | -1.037 |
//! | 90    | -1.282 |
//! | 95    | -1.645 |
//! | 99    | -2.327 |
//! | 99.9  | -3.090 |
//!
//! Typed callers use [`ReliabilityLevel`]; [`zr_for`] accepts a raw
//! percentage and falls back to the 95 % deviate for anything off the table.

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Z_R returned by [`zr_for`] for a percentage that is not in the table (95 %).
pub const FALLBACK_ZR: f64 = -1.645;

/// Tolerance used when matching a raw percentage against the table.
const PERCENT_TOLERANCE: f64 = 1e-9;

/// Design reliability level.
///
/// Serializes as its percentage, e.g. `90` or `99.9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ReliabilityLevel {
    R50,
    R60,
    R70,
    R75,
    R80,
    R85,
    #[default]
    R90,
    R95,
    R99,
    R99_9,
}

impl ReliabilityLevel {
    /// All tabulated levels, lowest first
    pub const ALL: [ReliabilityLevel; 10] = [
        ReliabilityLevel::R50,
        ReliabilityLevel::R60,
        ReliabilityLevel::R70,
        ReliabilityLevel::R75,
        ReliabilityLevel::R80,
        ReliabilityLevel::R85,
        ReliabilityLevel::R90,
        ReliabilityLevel::R95,
        ReliabilityLevel::R99,
        ReliabilityLevel::R99_9,
    ];

    /// Reliability as a percentage
    pub fn percent(&self) -> f64 {
        match self {
            ReliabilityLevel::R50 => 50.0,
            ReliabilityLevel::R60 => 60.0,
            ReliabilityLevel::R70 => 70.0,
            ReliabilityLevel::R75 => 75.0,
            ReliabilityLevel::R80 => 80.0,
            ReliabilityLevel::R85 => 85.0,
            ReliabilityLevel::R90 => 90.0,
            ReliabilityLevel::R95 => 95.0,
            ReliabilityLevel::R99 => 99.0,
            ReliabilityLevel::R99_9 => 99.9,
        }
    }

    /// Standard normal deviate Z_R
    pub fn z_r(&self) -> f64 {
        match self {
            ReliabilityLevel::R50 => 0.000,
            ReliabilityLevel::R60 => -0.253,
            ReliabilityLevel::R70 => -0.524,
            ReliabilityLevel::R75 => -0.674,
            ReliabilityLevel::R80 => -0.841,
            ReliabilityLevel::R85 => -1.037,
            ReliabilityLevel::R90 => -1.282,
            ReliabilityLevel::R95 => -1.645,
            ReliabilityLevel::R99 => -2.327,
            ReliabilityLevel::R99_9 => -3.090,
        }
    }

    /// Look up the level for a percentage, `None` if it is not tabulated.
    pub fn from_percent(percent: f64) -> Option<ReliabilityLevel> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| (level.percent() - percent).abs() < PERCENT_TOLERANCE)
    }

    /// Display name for UI
    pub fn display_name(&self) -> String {
        format!("{}% (Z_R = {:.3})", self.percent(), self.z_r())
    }
}

impl TryFrom<f64> for ReliabilityLevel {
    type Error = CalcError;

    fn try_from(percent: f64) -> Result<Self, Self::Error> {
        ReliabilityLevel::from_percent(percent).ok_or_else(|| {
            CalcError::invalid_input(
                "reliability",
                percent.to_string(),
                "Reliability must be one of 50, 60, 70, 75, 80, 85, 90, 95, 99, 99.9",
            )
        })
    }
}

impl From<ReliabilityLevel> for f64 {
    fn from(level: ReliabilityLevel) -> f64 {
        level.percent()
    }
}

impl std::fmt::Display for ReliabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Standard normal deviate for a reliability percentage.
///
/// Percentages outside the table return [`FALLBACK_ZR`] (the 95 % value)
/// instead of failing.
///
/// # Example
///
/// ```rust
/// use pave_core::reliability::zr_for;
///
/// assert_eq!(zr_for(90.0), -1.282);
/// assert_eq!(zr_for(99.9), -3.090);
/// assert_eq!(zr_for(42.0), -1.645);
/// ```
pub fn zr_for(reliability_percent: f64) -> f64 {
    match ReliabilityLevel::from_percent(reliability_percent) {
        Some(level) => level.z_r(),
        None => FALLBACK_ZR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        let expected = [
            (50.0, 0.000),
            (60.0, -0.253),
            (70.0, -0.524),
            (75.0, -0.674),
            (80.0, -0.841),
            (85.0, -1.037),
            (90.0, -1.282),
            (95.0, -1.645),
            (99.0, -2.327),
            (99.9, -3.090),
        ];
        for (percent, zr) in expected {
            assert_eq!(zr_for(percent), zr, "Z_R for {}%", percent);
        }
    }

    #[test]
    fn test_fallback() {
        assert_eq!(zr_for(0.0), FALLBACK_ZR);
        assert_eq!(zr_for(65.0), FALLBACK_ZR);
        assert_eq!(zr_for(99.99), FALLBACK_ZR);
        assert_eq!(zr_for(f64::NAN), FALLBACK_ZR);
    }

    #[test]
    fn test_levels_ordered() {
        for pair in ReliabilityLevel::ALL.windows(2) {
            assert!(pair[0].percent() < pair[1].percent());
            assert!(pair[0].z_r() > pair[1].z_r());
        }
    }

    #[test]
    fn test_from_percent_roundtrip() {
        for level in ReliabilityLevel::ALL {
            assert_eq!(ReliabilityLevel::from_percent(level.percent()), Some(level));
        }
        assert_eq!(ReliabilityLevel::from_percent(91.0), None);
    }

    #[test]
    fn test_serialization_as_percent() {
        let json = serde_json::to_string(&ReliabilityLevel::R99_9).unwrap();
        assert_eq!(json, "99.9");

        let level: ReliabilityLevel = serde_json::from_str("90").unwrap();
        assert_eq!(level, ReliabilityLevel::R90);

        assert!(serde_json::from_str::<ReliabilityLevel>("91").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ReliabilityLevel::R95.display_name(), "95% (Z_R = -1.645)");
        assert_eq!(ReliabilityLevel::default(), ReliabilityLevel::R90);
    }
}
