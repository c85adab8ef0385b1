//! # pave_core - Flexible Pavement Design Engine
//!
//! `pave_core` implements the AASHTO 1993 flexible pavement design procedure:
//! it solves the design equation for the required Structural Number (SN) and
//! splits that SN into asphalt, base and subbase thicknesses. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No NaN**: Inputs outside the equation's domain are rejected, never propagated
//!
//! ## Quick Start
//!
//! ```rust
//! use pave_core::reliability::zr_for;
//! use pave_core::calculations::structural_number::solve_structural_number;
//! use pave_core::calculations::layers::allocate_layers;
//!
//! let zr = zr_for(90.0);
//! let sn = solve_structural_number(1.0e6, zr, 0.45, 4.2 - 2.5, 10_000.0).unwrap();
//! let layers = allocate_layers(sn, 0.44, 0.14, 0.11, 1.0, 1.0);
//!
//! assert_eq!((layers.d1, layers.d2), (3.0, 6.0));
//! assert!(layers.d3 > 8.0 && layers.d3 < 9.0);
//! ```
//!
//! ## Modules
//!
//! - [`reliability`] - Reliability level to Z_R lookup
//! - [`calculations`] - SN solver, layer allocation, design pipeline, sensitivity sweeps
//! - [`equations`] - AASHTO 1993 equations and the equation registry
//! - [`materials`] - Typical layer coefficients
//! - [`settings`] - Solver tolerances, minimum thicknesses, input ranges
//! - [`units`] - Type-safe unit wrappers
//! - [`report`] / [`pdf`] - Text and PDF design reports
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON input loading and atomic report writes

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pdf;
pub mod reliability;
pub mod report;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    allocate_layers, solve_structural_number, LayerThicknesses, PavementDesignInput, PavementDesignResult,
};
pub use errors::{CalcError, CalcResult};
pub use reliability::{zr_for, ReliabilityLevel};
pub use settings::DesignSettings;
