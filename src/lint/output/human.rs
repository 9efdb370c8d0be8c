//! Human-readable output formatter.
//!
//! Formats lint diagnostics for terminal display with optional color support.

use console::Style;

use super::LintFormatter;
use crate::lint::{LintDiagnostic, Severity};
use std::io::Write;

/// Formats lint output for human consumption.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn severity_style(&self, severity: Severity) -> Style {
        let style = match severity {
            Severity::Hint => Style::new().cyan(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Error => Style::new().red().bold(),
        };
        style.force_styling(self.use_color)
    }

    fn dim(&self) -> Style {
        Style::new().dim().force_styling(self.use_color)
    }
}

impl LintFormatter for HumanFormatter {
    fn format<W: Write>(
        &self,
        diagnostics: &[LintDiagnostic],
        writer: &mut W,
    ) -> std::io::Result<()> {
        for diag in diagnostics {
            // error[rule_id]: message
            writeln!(
                writer,
                "{}: {}",
                self.severity_style(diag.severity)
                    .apply_to(format!("{}[{}]", diag.severity, diag.rule_id)),
                diag.message
            )?;

            if let Some(ref span) = diag.span {
                writeln!(writer, "  {} {}", self.dim().apply_to("-->"), span)?;
            }

            if let Some(ref suggestion) = diag.suggestion {
                writeln!(writer, "   = help: {}", suggestion)?;
            }

            writeln!(writer)?;
        }

        let error_count = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warning_count = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        if error_count > 0 || warning_count > 0 {
            writeln!(
                writer,
                "Found {} error(s) and {} warning(s)",
                error_count, warning_count
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{RuleId, Span};

    fn render(diagnostics: &[LintDiagnostic]) -> String {
        let mut output = Vec::new();
        HumanFormatter::new(false)
            .format(diagnostics, &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn formats_diagnostic_with_location() {
        let output = render(&[LintDiagnostic::new(
            RuleId::new("terraform_naming_standards"),
            Severity::Error,
            "variable name 'Bad' must match the following format: snake_case",
        )
        .with_span(Span::new("main.tf", 2, 1, 2, 15))]);

        assert!(output.starts_with(
            "error[terraform_naming_standards]: variable name 'Bad' must match the following format: snake_case\n"
        ));
        assert!(output.contains("  --> main.tf:2:1\n"));
    }

    #[test]
    fn formats_each_severity() {
        for (severity, prefix) in [
            (Severity::Hint, "hint[r]"),
            (Severity::Warning, "warning[r]"),
            (Severity::Error, "error[r]"),
        ] {
            let output = render(&[LintDiagnostic::new(RuleId::new("r"), severity, "m")]);
            assert!(output.starts_with(prefix), "{output}");
        }
    }

    #[test]
    fn formats_summary_line() {
        let output = render(&[
            LintDiagnostic::new(RuleId::new("r1"), Severity::Error, "err"),
            LintDiagnostic::new(RuleId::new("r2"), Severity::Warning, "warn"),
            LintDiagnostic::new(RuleId::new("r3"), Severity::Warning, "warn2"),
        ]);

        assert!(output.contains("Found 1 error(s) and 2 warning(s)"));
    }

    #[test]
    fn formats_suggestion() {
        let output = render(&[LintDiagnostic::new(RuleId::new("r"), Severity::Warning, "m")
            .with_suggestion("add ?ref=v1.0.0")]);

        assert!(output.contains("= help: add ?ref=v1.0.0"));
    }

    #[test]
    fn no_summary_when_no_issues() {
        assert!(render(&[]).is_empty());
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let output = render(&[LintDiagnostic::new(RuleId::new("r"), Severity::Error, "m")]);
        assert!(!output.contains('\u{1b}'));
    }
}
