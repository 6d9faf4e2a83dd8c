//! # PDF Report Module
//!
//! Builds a printable report from a [`CalculatorResult`] and its
//! [`CalculatorDefinition`] using Typst.
//!
//! ## Architecture
//!
//! - The report template is an embedded string constant
//! - Labels and units come from the definition, values from the result
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! Nothing here re-runs a formula: a report shows exactly what the result holds.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::input::RawInput;
//! use calc_core::pdf::{render_result_pdf, ReportMeta};
//! use calc_core::registry;
//!
//! let bmr = registry::global().get("bmr").unwrap();
//! let input = RawInput::new()
//!     .with("weightKg", 70.0)
//!     .with("heightCm", 175.0)
//!     .with("age", 30.0)
//!     .with("sex", "male");
//! let result = bmr.calculate(&input).unwrap();
//!
//! let pdf_bytes = render_result_pdf(bmr, &result, &ReportMeta::new("Dietitian", "Client")).unwrap();
//! std::fs::write("bmr_report.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::definition::CalculatorDefinition;
use crate::errors::{CalcError, CalcResult};
use crate::input::FieldValue;
use crate::result::CalculatorResult;

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

    /// Fonts bundled with typst-assets (Libertinus Serif, New Computer Modern, DejaVu Sans Mono)
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
// Report Metadata
// ============================================================================

/// Who the report is from and for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub prepared_by: String,
    pub prepared_for: String,
    pub generated: DateTime<Utc>,
}

impl ReportMeta {
    pub fn new(prepared_by: impl Into<String>, prepared_for: impl Into<String>) -> Self {
        Self {
            prepared_by: prepared_by.into(),
            prepared_for: prepared_for.into(),
            generated: Utc::now(),
        }
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for a calculator report
const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Metabolic Calculator Report]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{{PREPARED_FOR}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{CALCULATOR_NAME}}]
    #v(4pt)
    #text(size: 11pt)[{{DESCRIPTION}}]
  ]
]

#v(12pt)

#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Prepared by:], [{{PREPARED_BY}}],
  [Prepared for:], [{{PREPARED_FOR}}],
  [Date:], [{{DATE}}],
)

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

== Inputs

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Input*], [*Value*], [*Unit*]),
{{INPUT_ROWS}}
)

#v(12pt)

== Results

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Result*], [*Value*], [*Unit*]),
{{OUTPUT_ROWS}}
)
"##;

// ============================================================================
// Report Generation
// ============================================================================

/// Typst source for a calculator report.
///
/// ```rust
/// use calc_core::input::RawInput;
/// use calc_core::pdf::{report_typst, ReportMeta};
/// use calc_core::registry;
///
/// let owen = registry::global().get("owen").unwrap();
/// let result = owen.calculate(&RawInput::new().with("weightKg", 70.0).with("sex", "male")).unwrap();
///
/// let source = report_typst(owen, &result, &ReportMeta::new("Clinic", "A. Client"));
/// assert!(source.contains("Resting metabolic rate"));
/// assert!(source.contains("Body weight"));
/// ```
pub fn report_typst(definition: &CalculatorDefinition, result: &CalculatorResult, meta: &ReportMeta) -> String {
    let mut source = REPORT_TEMPLATE
        .replace("{{CALCULATOR_NAME}}", &escape_typst(definition.name))
        .replace("{{DESCRIPTION}}", &escape_typst(definition.description))
        .replace("{{PREPARED_BY}}", &escape_typst(or_placeholder(&meta.prepared_by)))
        .replace("{{PREPARED_FOR}}", &escape_typst(or_placeholder(&meta.prepared_for)))
        .replace("{{DATE}}", &meta.generated.format("%Y-%m-%d").to_string())
        .replace("{{INPUT_ROWS}}", &build_input_rows(definition, result))
        .replace("{{OUTPUT_ROWS}}", &build_output_rows(result));

    source.push_str(&result.equations.generate_appendix_typst());
    source
}

/// Render a calculator result to PDF bytes.
///
/// # Errors
///
/// `RenderFailed` when Typst compilation or PDF encoding fails.
pub fn render_result_pdf(
    definition: &CalculatorDefinition,
    result: &CalculatorResult,
    meta: &ReportMeta,
) -> CalcResult<Vec<u8>> {
    if result.calculator_id != definition.id {
        return Err(CalcError::Internal {
            message: format!(
                "result of '{}' cannot be reported with definition '{}'",
                result.calculator_id, definition.id
            ),
        });
    }

    let source = report_typst(definition, result, meta);
    let pdf = compile_pdf(source)?;
    debug!(calculator = definition.id, bytes = pdf.len(), "report rendered");
    Ok(pdf)
}

fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("typst compile", error_msgs.join("; "))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("pdf encode", error_msgs.join("; "))
    })
}

fn or_placeholder(s: &str) -> &str {
    if s.trim().is_empty() {
        "n/a"
    } else {
        s
    }
}

/// Escape special Typst characters in user-provided text
pub fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Input table rows, labelled from the definition
fn build_input_rows(definition: &CalculatorDefinition, result: &CalculatorResult) -> String {
    result
        .inputs
        .iter()
        .map(|echo| {
            let field = definition.field_by_id(&echo.id);
            let label = field.map(|f| f.label).unwrap_or(echo.id.as_str());
            let unit = field.and_then(|f| f.unit).map(|u| u.symbol()).unwrap_or("");
            let value = match &echo.value {
                FieldValue::Choice(choice) => field
                    .and_then(|f| f.option_label(choice))
                    .unwrap_or(choice.as_str())
                    .to_string(),
                other => other.to_string(),
            };
            let marker = if echo.defaulted { " (default)" } else { "" };
            format!(
                "  [{}{}], [{}], [{}],",
                escape_typst(label),
                marker,
                escape_typst(&value),
                escape_typst(unit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result table rows, in output order
fn build_output_rows(result: &CalculatorResult) -> String {
    result
        .outputs
        .iter()
        .map(|output| {
            format!(
                "  [{}], [{}], [{}],",
                escape_typst(&output.label),
                escape_typst(&output.value.display()),
                escape_typst(output.unit.map(|u| u.symbol()).unwrap_or(""))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInput;
    use crate::registry;

    fn meal_result() -> (&'static CalculatorDefinition, CalculatorResult) {
        let meal = registry::global().get("meal").unwrap();
        let input = RawInput::new().with("dailyCalories", 2400.0).with("mealsPerDay", 3.0);
        let result = meal.calculate(&input).unwrap();
        (meal, result)
    }

    #[test]
    fn test_report_contains_every_label() {
        let (meal, result) = meal_result();
        let source = report_typst(meal, &result, &ReportMeta::new("Dietitian", "Client"));

        for echo in &result.inputs {
            let label = meal.field_by_id(&echo.id).unwrap().label;
            assert!(source.contains(label), "missing input label {}", label);
        }
        for output in &result.outputs {
            assert!(source.contains(&output.label), "missing output label {}", output.label);
        }
        assert!(source.contains("Protein (default)"));
        assert!(source.contains("== Equations Used"));
    }

    #[test]
    fn test_choice_inputs_show_option_label() {
        let bmr = registry::global().get("bmr").unwrap();
        let input = RawInput::new()
            .with("weightKg", 70.0)
            .with("heightCm", 175.0)
            .with("age", 30.0)
            .with("sex", "female");
        let result = bmr.calculate(&input).unwrap();
        let source = report_typst(bmr, &result, &ReportMeta::new("", ""));

        assert!(source.contains("[Female]"));
        assert!(source.contains("[n/a]"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        assert_eq!(escape_typst("#1 *bold* [x]"), "\\#1 \\*bold\\* \\[x\\]");

        let (meal, result) = meal_result();
        let source = report_typst(meal, &result, &ReportMeta::new("Dr. #hash", "client_name"));
        assert!(source.contains("Dr. \\#hash"));
        assert!(source.contains("client\\_name"));
    }

    #[test]
    fn test_mismatched_definition_rejected() {
        let (_, result) = meal_result();
        let bmr = registry::global().get("bmr").unwrap();
        let err = render_result_pdf(bmr, &result, &ReportMeta::new("a", "b")).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_pdf_generation() {
        let (meal, result) = meal_result();
        let pdf = render_result_pdf(meal, &result, &ReportMeta::new("Test Dietitian", "Test Client"));

        // Should succeed
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        // PDF should start with %PDF
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        // Should be a reasonable size (at least 1KB)
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
