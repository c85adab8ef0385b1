//! # Layer Thickness Allocation
//!
//! Splits a required structural number into asphalt, base and subbase
//! thicknesses:
//!
//! ```text
//! SN = a1·D1 + a2·D2·m2 + a3·D3·m3
//! ```
//!
//! The asphalt and base layers are placed at their minimum thicknesses
//! (3.0 in and 6.0 in by default). Whatever SN is left over is carried by
//! the subbase, whose thickness is solved for directly and has no upper
//! bound. If the upper layers already cover the requirement, the layers
//! below are set to zero.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::layers::allocate_layers;
//!
//! let t = allocate_layers(3.112, 0.44, 0.14, 0.11, 1.0, 1.0);
//! assert_eq!(t.d1, 3.0);
//! assert_eq!(t.d2, 6.0);
//! assert!((t.d3 - 8.655).abs() < 1e-2);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::aashto::layered_structural_number;
use crate::errors::{CalcError, CalcResult};
use crate::materials::LayerMaterial;
use crate::units::{Centimeters, Inches};

pub use crate::settings::LayerMinimums;

/// Structural layer coefficients (per inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerCoefficients {
    /// Asphalt concrete surface
    pub a1: f64,
    /// Base course
    pub a2: f64,
    /// Subbase course
    pub a3: f64,
}

impl LayerCoefficients {
    pub fn new(a1: f64, a2: f64, a3: f64) -> Self {
        LayerCoefficients { a1, a2, a3 }
    }

    /// Typical coefficients for asphalt concrete over crushed stone base and
    /// granular subbase (0.44 / 0.14 / 0.11).
    pub fn typical() -> Self {
        LayerCoefficients {
            a1: LayerMaterial::AsphaltConcrete.typical_coefficient(),
            a2: LayerMaterial::CrushedStoneBase.typical_coefficient(),
            a3: LayerMaterial::GranularSubbase.typical_coefficient(),
        }
    }

    /// All coefficients must be finite and positive.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("a1", self.a1), ("a2", self.a2), ("a3", self.a3)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Layer coefficient must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl Default for LayerCoefficients {
    fn default() -> Self {
        Self::typical()
    }
}

/// Drainage coefficients for the base (m2) and subbase (m3).
///
/// 1.0 means drainage quality has no effect; the usual range is 0.8 to 1.2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrainageCoefficients {
    pub m2: f64,
    pub m3: f64,
}

impl DrainageCoefficients {
    pub fn new(m2: f64, m3: f64) -> Self {
        DrainageCoefficients { m2, m3 }
    }

    /// Both coefficients must be finite and positive.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [("m2", self.m2), ("m3", self.m3)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Drainage coefficient must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl Default for DrainageCoefficients {
    fn default() -> Self {
        DrainageCoefficients { m2: 1.0, m3: 1.0 }
    }
}

/// Layer thicknesses in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerThicknesses {
    /// Asphalt concrete surface D1 (in)
    pub d1: f64,
    /// Base course D2 (in)
    pub d2: f64,
    /// Subbase course D3 (in)
    pub d3: f64,
}

impl LayerThicknesses {
    /// Structural number carried by each layer.
    pub fn contributions(&self, coefficients: &LayerCoefficients, drainage: &DrainageCoefficients) -> LayerContributions {
        let sn1 = coefficients.a1 * self.d1;
        let sn2 = coefficients.a2 * self.d2 * drainage.m2;
        let sn3 = coefficients.a3 * self.d3 * drainage.m3;
        LayerContributions {
            sn1,
            sn2,
            sn3,
            total: layered_structural_number(
                (coefficients.a1, self.d1),
                (coefficients.a2, self.d2, drainage.m2),
                (coefficients.a3, self.d3, drainage.m3),
            ),
        }
    }

    /// Total section thickness (in)
    pub fn total(&self) -> Inches {
        Inches(self.d1 + self.d2 + self.d3)
    }

    /// Thicknesses converted to centimetres, `[D1, D2, D3]`
    pub fn to_centimeters(&self) -> [Centimeters; 3] {
        [
            Centimeters::from(Inches(self.d1)),
            Centimeters::from(Inches(self.d2)),
            Centimeters::from(Inches(self.d3)),
        ]
    }
}

/// Structural number provided by each layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerContributions {
    /// a1·D1
    pub sn1: f64,
    /// a2·D2·m2
    pub sn2: f64,
    /// a3·D3·m3
    pub sn3: f64,
    /// Sum of the three
    pub total: f64,
}

/// Allocate thicknesses for a required structural number.
///
/// # Arguments
/// * `sn_required` - Structural number to provide
/// * `coefficients` - Layer coefficients a1, a2, a3
/// * `drainage` - Drainage coefficients m2, m3
/// * `minimums` - Thicknesses placed for the asphalt and base layers
///
/// # Returns
/// Non-negative thicknesses. When D3 > 0 the section provides exactly
/// `sn_required`; otherwise it provides at least that much.
pub fn allocate(
    sn_required: f64,
    coefficients: &LayerCoefficients,
    drainage: &DrainageCoefficients,
    minimums: &LayerMinimums,
) -> LayerThicknesses {
    // Surface
    let d1 = minimums.asphalt_in;
    let remaining = sn_required - coefficients.a1 * d1;
    if remaining <= 0.0 {
        return LayerThicknesses { d1, d2: 0.0, d3: 0.0 };
    }

    // Base
    let d2 = minimums.base_in;
    let remaining = remaining - coefficients.a2 * d2 * drainage.m2;
    if remaining <= 0.0 {
        return LayerThicknesses { d1, d2, d3: 0.0 };
    }

    // Subbase takes the rest
    let d3 = remaining / (coefficients.a3 * drainage.m3);
    LayerThicknesses { d1, d2, d3 }
}

/// Allocate thicknesses with the default minimums (3.0 in asphalt, 6.0 in base).
///
/// Pass `1.0` for `m2` and `m3` when drainage is not considered.
pub fn allocate_layers(sn_required: f64, a1: f64, a2: f64, a3: f64, m2: f64, m3: f64) -> LayerThicknesses {
    allocate(
        sn_required,
        &LayerCoefficients::new(a1, a2, a3),
        &DrainageCoefficients::new(m2, m3),
        &LayerMinimums::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_allocation() {
        let sn = 3.1121754945;
        let t = allocate_layers(sn, 0.44, 0.14, 0.11, 1.0, 1.0);
        assert_eq!(t.d1, 3.0);
        assert_eq!(t.d2, 6.0);
        assert!((t.d3 - 0.952_175_494_5 / 0.11).abs() < 1e-6);

        let c = t.contributions(&LayerCoefficients::typical(), &DrainageCoefficients::default());
        assert!((c.sn1 - 1.32).abs() < 1e-12);
        assert!((c.sn2 - 0.84).abs() < 1e-12);
        assert!((c.total - sn).abs() < 1e-9);
    }

    #[test]
    fn test_surface_only() {
        // a1·3.0 = 1.32 covers the requirement
        assert_eq!(
            allocate_layers(1.32, 0.44, 0.14, 0.11, 1.0, 1.0),
            LayerThicknesses { d1: 3.0, d2: 0.0, d3: 0.0 }
        );
        assert_eq!(
            allocate_layers(0.0, 0.44, 0.14, 0.11, 1.0, 1.0),
            LayerThicknesses { d1: 3.0, d2: 0.0, d3: 0.0 }
        );
    }

    #[test]
    fn test_surface_and_base() {
        // 1.32 + 0.84 = 2.16
        let t = allocate_layers(2.0, 0.44, 0.14, 0.11, 1.0, 1.0);
        assert_eq!(t, LayerThicknesses { d1: 3.0, d2: 6.0, d3: 0.0 });

        let c = t.contributions(&LayerCoefficients::typical(), &DrainageCoefficients::default());
        assert!(c.total >= 2.0);
    }

    #[test]
    fn test_drainage_scales_subbase() {
        let wet = allocate_layers(4.0, 0.44, 0.14, 0.11, 1.0, 0.8);
        let dry = allocate_layers(4.0, 0.44, 0.14, 0.11, 1.0, 1.2);
        assert!(wet.d3 > dry.d3);
        assert!((wet.d3 * 0.8 - dry.d3 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_custom_minimums() {
        let minimums = LayerMinimums { asphalt_in: 4.0, base_in: 8.0 };
        let t = allocate(
            5.0,
            &LayerCoefficients::typical(),
            &DrainageCoefficients::default(),
            &minimums,
        );
        assert_eq!(t.d1, 4.0);
        assert_eq!(t.d2, 8.0);
        let c = t.contributions(&LayerCoefficients::typical(), &DrainageCoefficients::default());
        assert!((c.total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_centimeters() {
        let t = LayerThicknesses { d1: 3.0, d2: 6.0, d3: 10.0 };
        let [d1, d2, d3] = t.to_centimeters();
        assert!((d1.value() - 7.62).abs() < 1e-9);
        assert!((d2.value() - 15.24).abs() < 1e-9);
        assert!((d3.value() - 25.4).abs() < 1e-9);
        assert!((t.total().value() - 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_validation() {
        assert!(LayerCoefficients::typical().validate().is_ok());
        let err = LayerCoefficients::new(0.44, 0.0, 0.11).validate().unwrap_err();
        assert_eq!(err.field(), Some("a2"));
        let err = DrainageCoefficients::new(1.0, f64::NAN).validate().unwrap_err();
        assert_eq!(err.field(), Some("m3"));
    }
}
