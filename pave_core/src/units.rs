//! # Unit Types
//!
//! Type-safe wrappers for the units that appear in pavement design. These
//! are plain `f64` newtypes: JSON stays clean (just numbers) and there is no
//! runtime overhead.
//!
//! ## Units
//!
//! AASHTO 1993 is written in US customary units. Layer thicknesses are
//! designed in inches (in) and reported alongside centimetres (cm).
//!
//! ## Example
//!
//! ```rust
//! use pave_core::units::{Centimeters, Inches};
//!
//! let asphalt = Inches(3.0);
//! let metric: Centimeters = asphalt.into();
//! assert!((metric.0 - 7.62).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Centimetres per inch (exact)
pub const CM_PER_INCH: f64 = 2.54;

// ============================================================================
// Length Units
// ============================================================================

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Inches> for Centimeters {
    fn from(inches: Inches) -> Self {
        Centimeters(inches.0 * CM_PER_INCH)
    }
}

impl From<Centimeters> for Inches {
    fn from(cm: Centimeters) -> Self {
        Inches(cm.0 / CM_PER_INCH)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Inches);
impl_arithmetic!(Centimeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_centimeters() {
        let cm: Centimeters = Inches(6.0).into();
        assert!((cm.0 - 15.24).abs() < 1e-12);

        let back: Inches = cm.into();
        assert!((back.0 - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Inches(3.0);
        let b = Inches(6.0);
        assert_eq!((a + b).0, 9.0);
        assert_eq!((b - a).0, 3.0);
        assert_eq!((a * 2.0).0, 6.0);
        assert_eq!((b / 2.0).0, 3.0);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&Inches(8.5)).unwrap();
        assert_eq!(json, "8.5");
    }
}
