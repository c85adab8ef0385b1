//! # Pavement Design Equations
//!
//! The fundamental equations used in flexible pavement calculations, kept in
//! one place so they can be checked against the AASHTO guide and reused by
//! every calculation.
//!
//! ## Modules
//!
//! - [`aashto`] - AASHTO 1993 design equation, its derivative, and the
//!   layered structural number identity
//! - [`registry`] - Equation metadata and tracking for report appendices
//!
//! ## References
//!
//! - AASHTO Guide for Design of Pavement Structures, 1993

pub mod aashto;
pub mod registry;

pub use aashto::{
    allowable_esals,
    design_equation_derivative,
    design_equation_residual,
    layered_structural_number,
    serviceability_denominator,
    serviceability_denominator_derivative,
    serviceability_log_ratio,
    PSI_CALIBRATION_RANGE,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    flexible_design_equations,
    generate_equations_markdown,
};
