//! # Pavement Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` / `*Outcome` - Calculation results (JSON-serializable)
//! - `calculate(input, settings) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`structural_number`] - Newton-Raphson solution of the AASHTO 1993 design equation
//! - [`layers`] - Allocation of a structural number to layer thicknesses
//! - [`design`] - Full design chain from inputs to thicknesses
//! - [`sensitivity`] - Required SN against W18, M_R and reliability

pub mod design;
pub mod layers;
pub mod sensitivity;
pub mod structural_number;

// Re-export commonly used types
pub use design::{PavementDesignInput, PavementDesignResult};
pub use layers::{
    allocate, allocate_layers, DrainageCoefficients, LayerCoefficients, LayerContributions, LayerThicknesses,
};
pub use sensitivity::{SensitivityCurve, SensitivityParameter, SensitivityPoint};
pub use structural_number::{solve, solve_structural_number, SolverInput, SolverOutcome, Termination};
