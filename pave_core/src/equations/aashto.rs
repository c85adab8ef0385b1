//! # AASHTO 1993 Flexible Pavement Equations
//!
//! The flexible pavement design equation (AASHTO Guide for Design of
//! Pavement Structures, 1993, Part II, Figure 3.1) and the structural number
//! identity that ties SN to layer thicknesses.
//!
//! ## Notation
//!
//! - `W18` = Predicted number of 18-kip equivalent single axle loads
//! - `Z_R` = Standard normal deviate for the design reliability
//! - `S_o` = Combined standard error of traffic and performance prediction
//! - `ΔPSI` = Design serviceability loss, p_o - p_t
//! - `M_R` = Subgrade resilient modulus (psi)
//! - `SN` = Structural number
//!
//! ## Design Equation
//!
//! ```text
//! log10(W18) = Z_R·S_o + 9.36·log10(SN+1) - 0.20
//!            + log10(ΔPSI / (4.2 - 1.5)) / (0.40 + 1094/(SN+1)^5.19)
//!            + 2.32·log10(M_R) - 8.07
//! ```
//!
//! The solver works on the residual `f(SN) = RHS - log10(W18)`, whose root is
//! the required structural number.
//!
//! None of these functions validate their arguments: a non-positive `ΔPSI`,
//! `M_R` or `W18` yields NaN or infinity. Validation lives in
//! [`crate::calculations::structural_number`].

use std::f64::consts::LN_10;

/// Serviceability range the equation was calibrated on, 4.2 - 1.5
pub const PSI_CALIBRATION_RANGE: f64 = 4.2 - 1.5;

/// Coefficient on log10(SN+1)
const SN_LOG_COEFFICIENT: f64 = 9.36;

/// Coefficient on log10(M_R)
const MR_LOG_COEFFICIENT: f64 = 2.32;

/// Numerator of the SN-dependent term in the serviceability denominator
const DENOMINATOR_NUMERATOR: f64 = 1094.0;

/// Exponent on (SN+1) in the serviceability denominator
const DENOMINATOR_EXPONENT: f64 = 5.19;

// =============================================================================
// DESIGN EQUATION
// =============================================================================

/// Serviceability term numerator, log10(ΔPSI / 2.7)
///
/// Negative for ΔPSI < 2.7, zero at 2.7. Undefined for ΔPSI ≤ 0.
#[inline]
pub fn serviceability_log_ratio(delta_psi: f64) -> f64 {
    (delta_psi / PSI_CALIBRATION_RANGE).log10()
}

/// Serviceability term denominator, 0.40 + 1094/(SN+1)^5.19
#[inline]
pub fn serviceability_denominator(sn: f64) -> f64 {
    0.40 + DENOMINATOR_NUMERATOR / (sn + 1.0).powf(DENOMINATOR_EXPONENT)
}

/// Derivative of [`serviceability_denominator`] with respect to SN,
/// -1094·5.19·(SN+1)^(-6.19)
#[inline]
pub fn serviceability_denominator_derivative(sn: f64) -> f64 {
    -DENOMINATOR_NUMERATOR * DENOMINATOR_EXPONENT * (sn + 1.0).powf(-(DENOMINATOR_EXPONENT + 1.0))
}

/// Residual of the AASHTO 1993 flexible design equation at `sn`.
///
/// # Formula
///
/// f(SN) = Z_R·S_o + 9.36·log10(SN+1) - 0.20
///       + log10(ΔPSI/2.7) / (0.40 + 1094/(SN+1)^5.19)
///       + 2.32·log10(M_R) - 8.07 - log10(W18)
///
/// # Arguments
/// * `sn` - Trial structural number
/// * `w18` - Design traffic in 18-kip ESALs
/// * `zr` - Standard normal deviate
/// * `so` - Combined standard error
/// * `delta_psi` - Serviceability loss
/// * `mr_psi` - Subgrade resilient modulus (psi)
///
/// # Example
/// ```rust
/// use pave_core::equations::aashto::design_equation_residual;
///
/// // SN = 3.1122 satisfies the equation for a 1 million ESAL, 90 % design
/// let f = design_equation_residual(3.1122, 1.0e6, -1.282, 0.45, 1.7, 10_000.0);
/// assert!(f.abs() < 1e-4);
/// ```
///
/// # Reference
/// AASHTO 1993 Part II, Equation 3.1.1
#[inline]
pub fn design_equation_residual(sn: f64, w18: f64, zr: f64, so: f64, delta_psi: f64, mr_psi: f64) -> f64 {
    zr * so + SN_LOG_COEFFICIENT * (sn + 1.0).log10() - 0.20
        + serviceability_log_ratio(delta_psi) / serviceability_denominator(sn)
        + MR_LOG_COEFFICIENT * mr_psi.log10()
        - 8.07
        - w18.log10()
}

/// Closed-form derivative of [`design_equation_residual`] with respect to SN.
///
/// # Formula
///
/// f'(SN) = 9.36 / ((SN+1)·ln 10) + [-log10(ΔPSI/2.7)·D'(SN)] / D(SN)²
///
/// where D is [`serviceability_denominator`] and D' its derivative. The
/// traffic, reliability and subgrade terms are constant in SN and drop out.
#[inline]
pub fn design_equation_derivative(sn: f64, delta_psi: f64) -> f64 {
    let denominator = serviceability_denominator(sn);
    SN_LOG_COEFFICIENT / ((sn + 1.0) * LN_10)
        + (-serviceability_log_ratio(delta_psi) * serviceability_denominator_derivative(sn))
            / (denominator * denominator)
}

/// Allowable ESALs for a given structural number (the design equation solved
/// for W18 directly).
///
/// # Example
/// ```rust
/// use pave_core::equations::aashto::allowable_esals;
///
/// let w18 = allowable_esals(3.1122, -1.282, 0.45, 1.7, 10_000.0);
/// assert!((w18 / 1.0e6 - 1.0).abs() < 1e-3);
/// ```
#[inline]
pub fn allowable_esals(sn: f64, zr: f64, so: f64, delta_psi: f64, mr_psi: f64) -> f64 {
    // f(SN) with W18 = 1 gives log10(W18) directly
    10f64.powf(design_equation_residual(sn, 1.0, zr, so, delta_psi, mr_psi))
}

// =============================================================================
// STRUCTURAL NUMBER IDENTITY
// =============================================================================

/// Structural number of a three-layer section.
///
/// # Formula
/// SN = a1·D1 + a2·D2·m2 + a3·D3·m3
///
/// # Example
/// ```rust
/// use pave_core::equations::aashto::layered_structural_number;
///
/// let sn = layered_structural_number((0.44, 3.0), (0.14, 6.0, 1.0), (0.11, 8.0, 1.0));
/// assert!((sn - 3.04).abs() < 1e-12);
/// ```
///
/// # Reference
/// AASHTO 1993 Part II, Equation 3.1.3
#[inline]
pub fn layered_structural_number(surface: (f64, f64), base: (f64, f64, f64), subbase: (f64, f64, f64)) -> f64 {
    let (a1, d1) = surface;
    let (a2, d2, m2) = base;
    let (a3, d3, m3) = subbase;
    a1 * d1 + a2 * d2 * m2 + a3 * d3 * m3
}
