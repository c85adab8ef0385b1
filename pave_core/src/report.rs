//! # Text Reports
//!
//! Plain-text design report and sensitivity tables, suitable for terminal
//! output or saving as a `.txt` file.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::design::{calculate, PavementDesignInput};
//! use pave_core::report::render_text_report;
//! use pave_core::settings::DesignSettings;
//!
//! let input = PavementDesignInput::default();
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//!
//! let report = render_text_report(&input, &result);
//! assert!(report.contains("Required SN: 3.11"));
//! ```

use std::fmt::Write;

use crate::calculations::design::{PavementDesignInput, PavementDesignResult};
use crate::calculations::sensitivity::SensitivityCurve;
use crate::equations::aashto::allowable_esals;
use crate::materials::LayerMaterial;

const RULE_WIDTH: usize = 50;

/// Render the design report as plain text.
pub fn render_text_report(input: &PavementDesignInput, result: &PavementDesignResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let t = &result.thicknesses;
    let c = &result.contributions;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "AASHTO 1993 PAVEMENT DESIGN REPORT");
    let _ = writeln!(out, "{}", rule);
    if !input.label.is_empty() {
        let _ = writeln!(out, "Design: {}", input.label);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "INPUT PARAMETERS:");
    let _ = writeln!(out, "- W18 (ESAL): {}", format_thousands(input.w18));
    let _ = writeln!(out, "- Reliability: {}", input.reliability);
    let _ = writeln!(out, "- Standard Normal Deviate (ZR): {:.3}", result.zr);
    let _ = writeln!(out, "- Standard Error (So): {:.2}", input.standard_error);
    let _ = writeln!(out, "- Initial PSI: {:.1}", input.initial_psi);
    let _ = writeln!(out, "- Terminal PSI: {:.1}", input.terminal_psi);
    let _ = writeln!(out, "- ΔPSI: {:.1}", result.delta_psi);
    let _ = writeln!(out, "- Subgrade MR: {} psi", format_thousands(input.subgrade_mr_psi));
    let _ = writeln!(out);

    let _ = writeln!(out, "LAYER COEFFICIENTS:");
    let _ = writeln!(out, "- a1 (Asphalt): {:.2}", input.coefficients.a1);
    let _ = writeln!(out, "- a2 (Base): {:.2}", input.coefficients.a2);
    let _ = writeln!(out, "- a3 (Subbase): {:.2}", input.coefficients.a3);
    let _ = writeln!(out);

    let _ = writeln!(out, "DRAINAGE COEFFICIENTS:");
    let _ = writeln!(out, "- m2 (Base): {:.2}", input.drainage.m2);
    let _ = writeln!(out, "- m3 (Subbase): {:.2}", input.drainage.m3);
    let _ = writeln!(out);

    let _ = writeln!(out, "RESULTS:");
    let _ = writeln!(out, "- Required SN: {:.2}", result.structural_number);
    let _ = writeln!(
        out,
        "- Solver: {} after {} iteration(s), residual {:.2e}",
        result.solver.termination.display_name(),
        result.solver.iterations,
        result.solver.residual
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "LAYER THICKNESSES:");
    let [d1_cm, d2_cm, d3_cm] = t.to_centimeters();
    let layers = [
        (LayerMaterial::AsphaltConcrete, t.d1, d1_cm),
        (LayerMaterial::CrushedStoneBase, t.d2, d2_cm),
        (LayerMaterial::GranularSubbase, t.d3, d3_cm),
    ];
    for (material, d, cm) in layers {
        let _ = writeln!(
            out,
            "- {} ({}): {:.1} inches ({:.1} cm)",
            material.display_name(),
            material.position().thickness_symbol(),
            d,
            cm.value()
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "STRUCTURAL NUMBERS:");
    let _ = writeln!(out, "- SN1 (Asphalt): {:.2}", c.sn1);
    let _ = writeln!(out, "- SN2 (Base): {:.2}", c.sn2);
    let _ = writeln!(out, "- SN3 (Subbase): {:.2}", c.sn3);
    let _ = writeln!(out, "- Total SN: {:.2}", c.total);
    if result.surplus() > 0.005 {
        let _ = writeln!(out, "- Surplus over required: {:.2}", result.surplus());
    }
    let allowable = allowable_esals(
        c.total,
        result.zr,
        input.standard_error,
        result.delta_psi,
        input.subgrade_mr_psi,
    );
    let _ = writeln!(out, "- Allowable W18 at Total SN: {}", format_thousands(allowable));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Generated by pave_cli (AASHTO 1993 flexible pavement design)");
    out
}

/// Render a sensitivity curve as a two-column table.
///
/// ```rust
/// use pave_core::calculations::sensitivity::{SensitivityCurve, SensitivityParameter, SensitivityPoint};
/// use pave_core::report::render_sensitivity_table;
///
/// let curve = SensitivityCurve {
///     parameter: SensitivityParameter::Reliability,
///     points: vec![SensitivityPoint { value: 90.0, structural_number: 3.11 }],
/// };
/// let table = render_sensitivity_table(&curve);
/// assert!(table.contains("Reliability (%)"));
/// assert!(table.contains("3.11"));
/// assert!(table.ends_with("SN range: 3.11 - 3.11\n"));
/// ```
pub fn render_sensitivity_table(curve: &SensitivityCurve) -> String {
    let label = curve.parameter.axis_label();
    let width = label.len().max(12);
    let mut out = String::new();

    let _ = writeln!(out, "Sensitivity: SN vs {}", curve.parameter);
    let _ = writeln!(out, "{:>width$}  {:>8}", label, "SN", width = width);
    let _ = writeln!(out, "{}  {}", "-".repeat(width), "-".repeat(8));
    for point in &curve.points {
        let _ = writeln!(
            out,
            "{:>width$}  {:>8.2}",
            format_thousands(point.value),
            point.structural_number,
            width = width
        );
    }
    if let Some((lo, hi)) = curve.sn_range() {
        let _ = writeln!(out, "SN range: {:.2} - {:.2}", lo, hi);
    }
    out
}

/// Format a value with thousands separators and no decimals, e.g. `1,000,000`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::design::calculate;
    use crate::settings::DesignSettings;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1_000_000.0), "1,000,000");
        assert_eq!(format_thousands(10_000.0), "10,000");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(-12_345.0), "-12,345");
    }

    #[test]
    fn test_report_contents() {
        let input = PavementDesignInput {
            label: "Route 9".to_string(),
            ..PavementDesignInput::default()
        };
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let report = render_text_report(&input, &result);

        assert!(report.starts_with("AASHTO 1993 PAVEMENT DESIGN REPORT"));
        assert!(report.contains("Design: Route 9"));
        assert!(report.contains("- W18 (ESAL): 1,000,000"));
        assert!(report.contains("- Reliability: 90%"));
        assert!(report.contains("- Standard Normal Deviate (ZR): -1.282"));
        assert!(report.contains("- ΔPSI: 1.7"));
        assert!(report.contains("- Subgrade MR: 10,000 psi"));
        assert!(report.contains("- Required SN: 3.11"));
        assert!(report.contains("- Asphalt Concrete (D1): 3.0 inches (7.6 cm)"));
        assert!(report.contains("- Crushed Stone Base (D2): 6.0 inches (15.2 cm)"));
        assert!(report.contains("- Granular Subbase (D3): 8.7 inches (22.0 cm)"));
        assert!(report.contains("- SN1 (Asphalt): 1.32"));
        assert!(report.contains("- Total SN: 3.11"));
        assert!(!report.contains("Surplus"));
    }

    #[test]
    fn test_report_shows_surplus() {
        let input = PavementDesignInput {
            w18: 1.0e3,
            ..PavementDesignInput::default()
        };
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let report = render_text_report(&input, &result);
        assert!(report.contains("Surplus over required"));
        assert!(!report.contains("Design:"));
    }

    #[test]
    fn test_report_shows_allowable_traffic() {
        let input = PavementDesignInput {
            w18: 1.0e3,
            ..PavementDesignInput::default()
        };
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let allowable = allowable_esals(
            result.contributions.total,
            result.zr,
            input.standard_error,
            result.delta_psi,
            input.subgrade_mr_psi,
        );
        assert!(allowable > input.w18);

        let report = render_text_report(&input, &result);
        let expected = format!("- Allowable W18 at Total SN: {}", format_thousands(allowable));
        assert!(report.contains(&expected));
    }

    #[test]
    fn test_metric_thicknesses_match_layer_conversion() {
        let input = PavementDesignInput::default();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let report = render_text_report(&input, &result);
        let [_, _, d3_cm] = result.thicknesses.to_centimeters();
        assert!(report.contains(&format!("{:.1} inches ({:.1} cm)", result.thicknesses.d3, d3_cm.value())));
    }

    #[test]
    fn test_sensitivity_table_range() {
        use crate::calculations::sensitivity::sweep_reliability;

        let curve = sweep_reliability(&PavementDesignInput::default(), &DesignSettings::default()).unwrap();
        let (lo, hi) = curve.sn_range().unwrap();
        let table = render_sensitivity_table(&curve);
        assert!(table.contains(&format!("SN range: {:.2} - {:.2}", lo, hi)));
        assert_eq!(table.lines().count(), 3 + curve.points.len() + 1);
    }
}
