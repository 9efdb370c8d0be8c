//! JSON output formatter.
//!
//! Formats lint diagnostics as machine-readable JSON for tooling integration.

use super::LintFormatter;
use crate::lint::{LintDiagnostic, Severity, Span};
use serde::Serialize;
use std::io::Write;

/// Formats lint output as JSON.
#[derive(Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    rule_id: &'a str,
    severity: Severity,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<JsonRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonRange {
    file: String,
    start: JsonPosition,
    end: JsonPosition,
}

#[derive(Serialize)]
struct JsonPosition {
    line: usize,
    column: usize,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
    hints: usize,
}

impl From<&Span> for JsonRange {
    fn from(span: &Span) -> Self {
        Self {
            file: span.file.display().to_string(),
            start: JsonPosition {
                line: span.start_line,
                column: span.start_col,
            },
            end: JsonPosition {
                line: span.end_line,
                column: span.end_col,
            },
        }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl LintFormatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[LintDiagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();

        let output = JsonOutput {
            diagnostics: diagnostics
                .iter()
                .map(|d| JsonDiagnostic {
                    rule_id: d.rule_id.as_str(),
                    severity: d.severity,
                    message: &d.message,
                    range: d.span.as_ref().map(JsonRange::from),
                    suggestion: d.suggestion.as_deref(),
                })
                .collect(),
            summary: JsonSummary {
                total: diagnostics.len(),
                errors: count(Severity::Error),
                warnings: count(Severity::Warning),
                hints: count(Severity::Hint),
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}
