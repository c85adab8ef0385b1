//! # Layer Materials
//!
//! Typical structural layer coefficients for the three layers of a flexible
//! section (AASHTO 1993 Part II, Section 2.3.5).
//!
//! | Material | Layer | Typical a | Usual range |
//! |----------|-------|-----------|-------------|
//! | Asphalt concrete | Surface | 0.44 | 0.20 - 0.50 |
//! | Crushed stone base | Base | 0.14 | 0.05 - 0.20 |
//! | Granular subbase | Subbase | 0.11 | 0.05 - 0.15 |
//!
//! ## Example
//!
//! ```rust
//! use pave_core::materials::LayerMaterial;
//!
//! let asphalt = LayerMaterial::from_str_flexible("AC").unwrap();
//! assert_eq!(asphalt.typical_coefficient(), 0.44);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Position of a layer in the section, top down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerPosition {
    Surface,
    Base,
    Subbase,
}

impl LayerPosition {
    /// Thickness symbol used in reports (D1, D2, D3)
    pub fn thickness_symbol(&self) -> &'static str {
        match self {
            LayerPosition::Surface => "D1",
            LayerPosition::Base => "D2",
            LayerPosition::Subbase => "D3",
        }
    }
}

/// Layer materials with tabulated coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerMaterial {
    /// Dense-graded hot mix asphalt concrete
    #[serde(rename = "AC")]
    AsphaltConcrete,
    /// Crushed stone granular base
    #[serde(rename = "CSB")]
    CrushedStoneBase,
    /// Sandy gravel or similar granular subbase
    #[serde(rename = "GSB")]
    GranularSubbase,
}

impl LayerMaterial {
    /// All layer materials, top down
    pub const ALL: [LayerMaterial; 3] = [
        LayerMaterial::AsphaltConcrete,
        LayerMaterial::CrushedStoneBase,
        LayerMaterial::GranularSubbase,
    ];

    /// Short code (e.g., "AC")
    pub fn code(&self) -> &'static str {
        match self {
            LayerMaterial::AsphaltConcrete => "AC",
            LayerMaterial::CrushedStoneBase => "CSB",
            LayerMaterial::GranularSubbase => "GSB",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_uppercase().replace([' ', '_'], "-").as_str() {
            "AC" | "ASPHALT" | "ASPHALT-CONCRETE" | "HMA" => Ok(LayerMaterial::AsphaltConcrete),
            "CSB" | "BASE" | "CRUSHED-STONE" | "CRUSHED-STONE-BASE" => Ok(LayerMaterial::CrushedStoneBase),
            "GSB" | "SUBBASE" | "GRANULAR-SUBBASE" => Ok(LayerMaterial::GranularSubbase),
            _ => Err(CalcError::invalid_input(
                "material",
                s,
                "Unknown layer material (expected AC, CSB or GSB)",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerMaterial::AsphaltConcrete => "Asphalt Concrete",
            LayerMaterial::CrushedStoneBase => "Crushed Stone Base",
            LayerMaterial::GranularSubbase => "Granular Subbase",
        }
    }

    /// Layer this material is normally used in
    pub fn position(&self) -> LayerPosition {
        match self {
            LayerMaterial::AsphaltConcrete => LayerPosition::Surface,
            LayerMaterial::CrushedStoneBase => LayerPosition::Base,
            LayerMaterial::GranularSubbase => LayerPosition::Subbase,
        }
    }

    /// Typical structural layer coefficient (per inch)
    pub fn typical_coefficient(&self) -> f64 {
        match self {
            LayerMaterial::AsphaltConcrete => 0.44,
            LayerMaterial::CrushedStoneBase => 0.14,
            LayerMaterial::GranularSubbase => 0.11,
        }
    }

    /// Usual coefficient range `(min, max)`
    pub fn coefficient_range(&self) -> (f64, f64) {
        match self {
            LayerMaterial::AsphaltConcrete => (0.20, 0.50),
            LayerMaterial::CrushedStoneBase => (0.05, 0.20),
            LayerMaterial::GranularSubbase => (0.05, 0.15),
        }
    }
}

impl std::fmt::Display for LayerMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
