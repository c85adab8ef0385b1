//! # Equation Registry
//!
//! Central registry of the equations used in a flexible pavement design.
//! Each equation carries metadata (formula, reference, variables) so reports
//! can print an equations appendix and `EQUATIONS.md` can be regenerated from
//! source.
//!
//! ## Usage
//!
//! ```rust
//! use pave_core::equations::registry::{Equation, EquationUsage};
//!
//! // Track equation usage during a calculation
//! let usage = EquationUsage::new(Equation::FlexibleDesignEquation, "Required SN");
//!
//! // Get metadata for the PDF appendix
//! let meta = Equation::FlexibleDesignEquation.metadata();
//! println!("Formula: {}", meta.formula_typst);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Reference to a design guide or textbook source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// AASHTO Guide for Design of Pavement Structures, 1993
    Aashto93 {
        part: &'static str,
        item: &'static str,
    },
    /// Standard numerical analysis (root finding)
    NumericalMethods,
    /// Unit definitions
    UnitDefinition,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Aashto93 { part, item } => {
                format!("AASHTO 1993 Part {}, {}", part, item)
            }
            CodeReference::NumericalMethods => "Newton-Raphson Method".to_string(),
            CodeReference::UnitDefinition => "Unit Definition".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Aashto93 { .. } => "AASHTO 93",
            CodeReference::NumericalMethods => "Numerical",
            CodeReference::UnitDefinition => "Units",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Derived design inputs (ΔPSI, Z_R)
    DesignInputs,
    /// The AASHTO performance equation itself
    PerformanceEquation,
    /// Iterative solution for SN
    NumericalSolution,
    /// Layer thickness allocation
    LayerDesign,
    /// Unit conversions for reporting
    UnitConversion,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::DesignInputs => "Design Inputs",
            EquationCategory::PerformanceEquation => "Performance Equation",
            EquationCategory::NumericalSolution => "Numerical Solution",
            EquationCategory::LayerDesign => "Layer Design",
            EquationCategory::UnitConversion => "Unit Conversion",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::DesignInputs => 1,
            EquationCategory::PerformanceEquation => 2,
            EquationCategory::NumericalSolution => 3,
            EquationCategory::LayerDesign => 4,
            EquationCategory::UnitConversion => 5,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "SN", "W_18")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "in", "psi", "-")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for a design equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// Source reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations used in a flexible pavement design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// ΔPSI = p_o - p_t
    ServiceabilityLoss,
    /// Z_R from the reliability table
    ReliabilityDeviate,
    /// AASHTO 1993 flexible pavement design equation
    FlexibleDesignEquation,
    /// f'(SN), closed form
    DesignEquationDerivative,
    /// SN_{k+1} = SN_k - f/f'
    NewtonRaphsonUpdate,
    /// SN = a1 D1 + a2 D2 m2 + a3 D3 m3
    LayeredStructuralNumber,
    /// SN1 = a1 D1
    SurfaceLayerContribution,
    /// SN2 = a2 D2 m2
    BaseLayerContribution,
    /// D3 = (SN - SN1 - SN2) / (a3 m3)
    SubbaseThickness,
    /// cm = 2.54 in
    InchToCentimeter,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::ServiceabilityLoss => EquationMetadata {
                name: "Design Serviceability Loss",
                description: "Loss in present serviceability index tolerated over the design period",
                formula_typst: r#"$Delta "PSI" = p_o - p_t$"#,
                formula_plain: "dPSI = p_o - p_t",
                reference: CodeReference::Aashto93 { part: "II", item: "Section 2.2.1" },
                variables: vec![
                    Variable::new("p_o", "Initial serviceability index", "-"),
                    Variable::new("p_t", "Terminal serviceability index", "-"),
                ],
                assumptions: vec!["p_o > p_t"],
                category: EquationCategory::DesignInputs,
                source_module: "calculations/design.rs",
                source_function: "PavementDesignInput::delta_psi",
            },

            Equation::ReliabilityDeviate => EquationMetadata {
                name: "Standard Normal Deviate",
                description: "Standard normal deviate corresponding to the selected design reliability",
                formula_typst: r#"$Z_R = Phi^(-1)(1 - R)$"#,
                formula_plain: "Z_R = table lookup of R (50% -> 0.000 ... 99.9% -> -3.090)",
                reference: CodeReference::Aashto93 { part: "I", item: "Table 4.1" },
                variables: vec![
                    Variable::new("R", "Design reliability", "%"),
                    Variable::new("Z_R", "Standard normal deviate", "-"),
                ],
                assumptions: vec!["R is one of the tabulated levels; others use the 95% value"],
                category: EquationCategory::DesignInputs,
                source_module: "reliability.rs",
                source_function: "zr_for",
            },

            Equation::FlexibleDesignEquation => EquationMetadata {
                name: "Flexible Pavement Design Equation",
                description: "Relates traffic, reliability, serviceability loss and subgrade modulus to the required structural number",
                formula_typst: r#"$log_10 W_18 = Z_R S_o + 9.36 log_10(S N + 1) - 0.20 + (log_10(Delta "PSI" \/ 2.7)) / (0.40 + 1094 \/ (S N + 1)^5.19) + 2.32 log_10 M_R - 8.07$"#,
                formula_plain: "log10(W18) = ZR*So + 9.36*log10(SN+1) - 0.20 + log10(dPSI/2.7)/(0.40 + 1094/(SN+1)^5.19) + 2.32*log10(MR) - 8.07",
                reference: CodeReference::Aashto93 { part: "II", item: "Figure 3.1" },
                variables: vec![
                    Variable::new("W_18", "Predicted 18-kip ESAL applications", "ESAL"),
                    Variable::new("Z_R", "Standard normal deviate", "-"),
                    Variable::new("S_o", "Combined standard error", "-"),
                    Variable::new("Delta \"PSI\"", "Design serviceability loss", "-"),
                    Variable::new("M_R", "Subgrade resilient modulus", "psi"),
                    Variable::new("S N", "Structural number", "-"),
                ],
                assumptions: vec![
                    "Flexible pavement, single design traffic stream",
                    "Delta PSI > 0, M_R > 0, W_18 > 0",
                ],
                category: EquationCategory::PerformanceEquation,
                source_module: "equations/aashto.rs",
                source_function: "design_equation_residual",
            },

            Equation::DesignEquationDerivative => EquationMetadata {
                name: "Design Equation Derivative",
                description: "Slope of the design equation residual with respect to SN",
                formula_typst: r#"$f'(S N) = 9.36 / ((S N + 1) ln 10) - (log_10(Delta "PSI" \/ 2.7) D'(S N)) / D(S N)^2$"#,
                formula_plain: "f'(SN) = 9.36/((SN+1)*ln10) - log10(dPSI/2.7)*D'(SN)/D(SN)^2, D = 0.40 + 1094/(SN+1)^5.19",
                reference: CodeReference::NumericalMethods,
                variables: vec![
                    Variable::new("D", "Serviceability denominator 0.40 + 1094/(SN+1)^5.19", "-"),
                    Variable::new("D'", "-1094 * 5.19 * (SN+1)^(-6.19)", "-"),
                ],
                assumptions: vec!["Analytic derivative, no finite differencing"],
                category: EquationCategory::NumericalSolution,
                source_module: "equations/aashto.rs",
                source_function: "design_equation_derivative",
            },

            Equation::NewtonRaphsonUpdate => EquationMetadata {
                name: "Newton-Raphson Update",
                description: "Iterative update of the trial structural number",
                formula_typst: r#"$S N_(k+1) = S N_k - f(S N_k) / (f'(S N_k))$"#,
                formula_plain: "SN_(k+1) = SN_k - f(SN_k)/f'(SN_k)",
                reference: CodeReference::NumericalMethods,
                variables: vec![
                    Variable::new("S N_k", "Trial structural number at iteration k", "-"),
                    Variable::new("f", "Design equation residual", "-"),
                ],
                assumptions: vec![
                    "Seed SN_0 = 3.0",
                    "Iterates clamped to >= 0.01",
                    "Stops when |SN_(k+1) - SN_k| < 1e-6 or after 100 iterations",
                ],
                category: EquationCategory::NumericalSolution,
                source_module: "calculations/structural_number.rs",
                source_function: "solve",
            },

            Equation::LayeredStructuralNumber => EquationMetadata {
                name: "Layered Structural Number",
                description: "Structural number provided by a three-layer section",
                formula_typst: r#"$S N = a_1 D_1 + a_2 D_2 m_2 + a_3 D_3 m_3$"#,
                formula_plain: "SN = a1*D1 + a2*D2*m2 + a3*D3*m3",
                reference: CodeReference::Aashto93 { part: "II", item: "Equation 3.1.3" },
                variables: vec![
                    Variable::new("a_i", "Layer coefficient", "1/in"),
                    Variable::new("D_i", "Layer thickness", "in"),
                    Variable::new("m_i", "Drainage coefficient", "-"),
                ],
                assumptions: vec!["Surface layer has no drainage modifier"],
                category: EquationCategory::LayerDesign,
                source_module: "equations/aashto.rs",
                source_function: "layered_structural_number",
            },

            Equation::SurfaceLayerContribution => EquationMetadata {
                name: "Surface Layer Contribution",
                description: "Structural number carried by the asphalt concrete at its minimum thickness",
                formula_typst: r#"$S N_1 = a_1 D_1$"#,
                formula_plain: "SN1 = a1*D1",
                reference: CodeReference::Aashto93 { part: "II", item: "Section 3.1.5" },
                variables: vec![
                    Variable::new("a_1", "Asphalt layer coefficient", "1/in"),
                    Variable::new("D_1", "Asphalt thickness (minimum 3.0)", "in"),
                ],
                assumptions: vec!["D_1 fixed at the minimum asphalt thickness"],
                category: EquationCategory::LayerDesign,
                source_module: "calculations/layers.rs",
                source_function: "allocate",
            },

            Equation::BaseLayerContribution => EquationMetadata {
                name: "Base Layer Contribution",
                description: "Structural number carried by the base course at its minimum thickness",
                formula_typst: r#"$S N_2 = a_2 D_2 m_2$"#,
                formula_plain: "SN2 = a2*D2*m2",
                reference: CodeReference::Aashto93 { part: "II", item: "Section 3.1.5" },
                variables: vec![
                    Variable::new("a_2", "Base layer coefficient", "1/in"),
                    Variable::new("D_2", "Base thickness (minimum 6.0)", "in"),
                    Variable::new("m_2", "Base drainage coefficient", "-"),
                ],
                assumptions: vec!["D_2 fixed at the minimum base thickness"],
                category: EquationCategory::LayerDesign,
                source_module: "calculations/layers.rs",
                source_function: "allocate",
            },

            Equation::SubbaseThickness => EquationMetadata {
                name: "Subbase Thickness",
                description: "Subbase thickness that closes the remaining structural number",
                formula_typst: r#"$D_3 = (S N - S N_1 - S N_2) / (a_3 m_3)$"#,
                formula_plain: "D3 = (SN - SN1 - SN2)/(a3*m3)",
                reference: CodeReference::Aashto93 { part: "II", item: "Section 3.1.5" },
                variables: vec![
                    Variable::new("a_3", "Subbase layer coefficient", "1/in"),
                    Variable::new("m_3", "Subbase drainage coefficient", "-"),
                    Variable::new("D_3", "Subbase thickness", "in"),
                ],
                assumptions: vec!["D_3 = 0 when the upper layers already carry SN", "No upper bound on D_3"],
                category: EquationCategory::LayerDesign,
                source_module: "calculations/layers.rs",
                source_function: "allocate",
            },

            Equation::InchToCentimeter => EquationMetadata {
                name: "Inch to Centimetre",
                description: "Conversion of layer thicknesses for metric reporting",
                formula_typst: r#"$D_"cm" = 2.54 D_"in"$"#,
                formula_plain: "D_cm = 2.54 * D_in",
                reference: CodeReference::UnitDefinition,
                variables: vec![
                    Variable::new("D_\"in\"", "Thickness", "in"),
                    Variable::new("D_\"cm\"", "Thickness", "cm"),
                ],
                assumptions: vec![],
                category: EquationCategory::UnitConversion,
                source_module: "units.rs",
                source_function: "Centimeters::from",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories, in appendix order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            DesignInputs,
            PerformanceEquation,
            NumericalSolution,
            LayerDesign,
            UnitConversion,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::ServiceabilityLoss,
    Equation::ReliabilityDeviate,
    Equation::FlexibleDesignEquation,
    Equation::DesignEquationDerivative,
    Equation::NewtonRaphsonUpdate,
    Equation::LayeredStructuralNumber,
    Equation::SurfaceLayerContribution,
    Equation::BaseLayerContribution,
    Equation::SubbaseThickness,
    Equation::InchToCentimeter,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where/why it was used (e.g., "Subbase layer")
    pub context: String,
    /// Optional: the design label this equation was applied to
    pub design_label: Option<String>,
}

impl EquationUsage {
    /// Create a new equation usage record
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            design_label: None,
        }
    }

    /// Create usage record with design label
    pub fn for_design(equation: Equation, context: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            design_label: Some(label.into()),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a specific design
    pub fn record_for_design(&mut self, equation: Equation, context: impl Into<String>, label: impl Into<String>) {
        self.usages.push(EquationUsage::for_design(equation, context, label));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation for appendix generation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category for appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Merge another tracker into this one
    pub fn merge(&mut self, other: EquationTracker) {
        self.usages.extend(other.usages);
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pave_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_design(Equation::FlexibleDesignEquation, "Required SN", "Route 9");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Flexible Pavement Design Equation"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)

#text(size: 10pt)[
  This appendix lists the equations used in this pavement design, with
  their formula, reference, and the designs to which they were applied.
]

#v(16pt)
"##);

        let by_category = self.by_category();

        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this design.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", escape_typst_text(meta.description)));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", escape_typst_text(&meta.reference.citation())));

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");

                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            escape_typst_text(var.description),
                            escape_typst_text(var.units)
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut labels: Vec<&str> = usages
                        .iter()
                        .filter_map(|u| u.design_label.as_deref())
                        .collect();
                    labels.sort();
                    labels.dedup();

                    if !labels.is_empty() {
                        output.push_str(&format!("*Applied to:* {}\n\n", escape_typst_text(&labels.join(", "))));
                    }
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", escape_typst_text(assumption)));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output
    }
}

/// Get the equations applied in every flexible pavement design, in the order
/// the design pipeline uses them.
pub fn flexible_design_equations() -> Vec<Equation> {
    vec![
        Equation::ServiceabilityLoss,
        Equation::ReliabilityDeviate,
        Equation::FlexibleDesignEquation,
        Equation::DesignEquationDerivative,
        Equation::NewtonRaphsonUpdate,
        Equation::SurfaceLayerContribution,
        Equation::BaseLayerContribution,
        Equation::SubbaseThickness,
        Equation::LayeredStructuralNumber,
        Equation::InchToCentimeter,
    ]
}

/// Escape special characters for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

/// Escape markup characters in plain text placed in Typst content
pub(crate) fn escape_typst_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate a complete EQUATIONS.md listing every registered equation.
///
/// # Example
///
/// ```rust
/// use pave_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Pavement Design Equations Reference"));
/// assert!(markdown.contains("Layer Design"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(12_000);

    output.push_str(r#"# Pavement Design Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists the formulas used in AASHTO 1993 flexible pavement
designs, with their reference, source location, and assumptions.

## Units

| Quantity | Unit |
|----------|------|
| Traffic W18 | 18-kip ESAL |
| Resilient modulus M_R | psi |
| Layer thickness D | in |
| Layer coefficient a | 1/in |

---

"#);

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}

// ============================================================================
// Tests
// ============================================================================
