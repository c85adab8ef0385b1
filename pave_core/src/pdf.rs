//! # PDF Generation Module
//!
//! Generates PDF design reports using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via `{{PLACEHOLDER}}` replacement before compilation
//! - An equations appendix is appended from the equation registry
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::calculations::design::{calculate, PavementDesignInput};
//! use pave_core::pdf::render_design_pdf;
//! use pave_core::settings::DesignSettings;
//!
//! let input = PavementDesignInput::default();
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! let pdf_bytes = render_design_pdf(&input, &result, "Jane Engineer", "25-001").unwrap();
//! std::fs::write("pavement_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::design::{PavementDesignInput, PavementDesignResult};
use crate::equations::registry::escape_typst_text;
use crate::errors::{CalcError, CalcResult};
use crate::report::format_thousands;
use crate::units::Centimeters;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Fonts bundled with typst-assets (text, monospace and math)
    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Typst template for a flexible pavement design report
const DESIGN_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Flexible Pavement Design Calculations]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Flexible Pavement Design]
    #v(4pt)
    #text(size: 14pt)[{{DESIGN_LABEL}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    AASHTO Guide for Design of Pavement Structures, 1993
  ]
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Design Inputs

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Design traffic (W#sub[18])], [{{W18}}], [ESAL],
  [Reliability (R)], [{{RELIABILITY}}], [%],
  [Standard normal deviate (Z#sub[R])], [{{ZR}}], [],
  [Combined standard error (S#sub[o])], [{{SO}}], [],
  [Initial serviceability (p#sub[o])], [{{P0}}], [],
  [Terminal serviceability (p#sub[t])], [{{PT}}], [],
  [Serviceability loss (ΔPSI)], [{{DPSI}}], [],
  [Subgrade resilient modulus (M#sub[R])], [{{MR}}], [psi],
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Required Structural Number

The AASHTO 1993 flexible design equation is solved for SN by Newton-Raphson
iteration:

$ log_10 W_18 = Z_R S_o + 9.36 log_10("SN" + 1) - 0.20 + (log_10(Delta "PSI" / 2.7)) / (0.40 + 1094 / ("SN" + 1)^5.19) + 2.32 log_10 M_R - 8.07 $

$ "SN"_"req" = {{SN}} $

#text(size: 9pt, fill: gray)[Solver: {{TERMINATION}} after {{ITERATIONS}} iteration(s), residual {{RESIDUAL}}]

#v(12pt)

== Layer Thicknesses

$ "SN" = a_1 D_1 + a_2 D_2 m_2 + a_3 D_3 m_3 $

#table(
  columns: (1fr, auto, auto, auto, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, right, right, right, right),
  table.header([*Layer*], [*a*], [*m*], [*D (in)*], [*D (cm)*], [*SN#sub[i]*]),
  [Asphalt Concrete], [{{A1}}], [1.00], [{{D1_IN}}], [{{D1_CM}}], [{{SN1}}],
  [Crushed Stone Base], [{{A2}}], [{{M2}}], [{{D2_IN}}], [{{D2_CM}}], [{{SN2}}],
  [Granular Subbase], [{{A3}}], [{{M3}}], [{{D3_IN}}], [{{D3_CM}}], [{{SN3}}],
  table.footer([*Total*], [], [], [*{{TOTAL_IN}}*], [*{{TOTAL_CM}}*], [*{{SN_TOTAL}}*]),
)

#v(16pt)

#let pass_status = "{{OVERALL_PASS}}"
#align(center)[
  #block(
    width: auto,
    fill: if pass_status == "PASS" { rgb("#d4edda") } else { rgb("#f8d7da") },
    inset: 16pt,
    radius: 4pt
  )[
    #text(size: 16pt, weight: "bold")[
      #if pass_status == "PASS" [
        SECTION ADEQUATE
      ] else [
        SECTION INADEQUATE
      ]
    ]
    #v(4pt)
    #text(size: 12pt)[Provided SN {{SN_TOTAL}} vs required {{SN}}]
  ]
]

#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Generated by pave_cli \
  Designs should be verified by a licensed professional engineer.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a pavement design to PDF.
///
/// # Arguments
///
/// * `input` - The design inputs
/// * `result` - The design results
/// * `engineer` - Engineer name for the report
/// * `job_id` - Job/project ID
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError)` - If Typst compilation or PDF export fails
pub fn render_design_pdf(
    input: &PavementDesignInput,
    result: &PavementDesignResult,
    engineer: &str,
    job_id: &str,
) -> CalcResult<Vec<u8>> {
    let t = &result.thicknesses;
    let c = &result.contributions;
    let [d1_cm, d2_cm, d3_cm] = t.to_centimeters();
    let total_cm = Centimeters::from(t.total());
    let label = if input.label.is_empty() { "Flexible Pavement" } else { input.label.as_str() };

    let mut source = DESIGN_TEMPLATE
        .replace("{{DESIGN_LABEL}}", &escape_typst_text(label))
        .replace("{{ENGINEER}}", &escape_typst_text(engineer))
        .replace("{{JOB_ID}}", &escape_typst_text(job_id))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{W18}}", &format_thousands(input.w18))
        .replace("{{RELIABILITY}}", &input.reliability.percent().to_string())
        .replace("{{ZR}}", &format!("{:.3}", result.zr))
        .replace("{{SO}}", &format!("{:.2}", input.standard_error))
        .replace("{{P0}}", &format!("{:.1}", input.initial_psi))
        .replace("{{PT}}", &format!("{:.1}", input.terminal_psi))
        .replace("{{DPSI}}", &format!("{:.2}", result.delta_psi))
        .replace("{{MR}}", &format_thousands(input.subgrade_mr_psi))
        .replace("{{SN}}", &format!("{:.2}", result.structural_number))
        .replace("{{TERMINATION}}", result.solver.termination.display_name())
        .replace("{{ITERATIONS}}", &result.solver.iterations.to_string())
        .replace("{{RESIDUAL}}", &format!("{:.2e}", result.solver.residual))
        .replace("{{A1}}", &format!("{:.2}", input.coefficients.a1))
        .replace("{{A2}}", &format!("{:.2}", input.coefficients.a2))
        .replace("{{A3}}", &format!("{:.2}", input.coefficients.a3))
        .replace("{{M2}}", &format!("{:.2}", input.drainage.m2))
        .replace("{{M3}}", &format!("{:.2}", input.drainage.m3))
        .replace("{{D1_IN}}", &format!("{:.1}", t.d1))
        .replace("{{D2_IN}}", &format!("{:.1}", t.d2))
        .replace("{{D3_IN}}", &format!("{:.1}", t.d3))
        .replace("{{D1_CM}}", &format!("{:.1}", d1_cm.value()))
        .replace("{{D2_CM}}", &format!("{:.1}", d2_cm.value()))
        .replace("{{D3_CM}}", &format!("{:.1}", d3_cm.value()))
        .replace("{{TOTAL_IN}}", &format!("{:.1}", t.total().value()))
        .replace("{{TOTAL_CM}}", &format!("{:.1}", total_cm.value()))
        .replace("{{SN1}}", &format!("{:.2}", c.sn1))
        .replace("{{SN2}}", &format!("{:.2}", c.sn2))
        .replace("{{SN3}}", &format!("{:.2}", c.sn3))
        .replace("{{SN_TOTAL}}", &format!("{:.2}", c.total))
        .replace("{{OVERALL_PASS}}", if result.is_adequate() { "PASS" } else { "FAIL" });

    source.push_str(&result.equations_used(label).generate_appendix_typst());

    compile_pdf(source)
}

/// Compile a Typst source string to PDF bytes.
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors
            .iter()
            .map(|e| e.message.to_string())
            .collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })
}
