//! Lint command implementation.
//!
//! The `tfstyle lint` command loads a module directory and its
//! `.tfstyle.yml`, runs the enabled rules and reports the findings.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::args::LintArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::hcl::Module;
use crate::lint::{
    HumanFormatter, JsonFormatter, LintDiagnostic, LintFormatter, Linter, OutputFormat,
    SarifFormatter, Severity,
};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The lint command implementation.
pub struct LintCommand {
    config_path: Option<PathBuf>,
    args: LintArgs,
}

impl LintCommand {
    /// Create a new lint command.
    pub fn new(config_path: Option<PathBuf>, args: LintArgs) -> Self {
        Self { config_path, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &LintArgs {
        &self.args
    }

    /// Format diagnostics using the requested formatter.
    fn format_output(&self, linter: &Linter, diagnostics: &[LintDiagnostic]) -> Result<String> {
        let mut output = Vec::new();

        match self.args.format {
            OutputFormat::Json => JsonFormatter::new().format(diagnostics, &mut output)?,
            OutputFormat::Sarif => SarifFormatter::new("tfstyle", env!("CARGO_PKG_VERSION"))
                .with_rules(linter.registry())
                .format(diagnostics, &mut output)?,
            OutputFormat::Human => {
                HumanFormatter::new(console::colors_enabled()).format(diagnostics, &mut output)?
            }
        }

        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

impl Command for LintCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = &self.args.dir;
        let module = Module::load(dir)?;
        let config = load_config(dir, self.config_path.as_deref())?;
        debug!(
            "Linting {} file(s) in {}",
            module.files.len(),
            dir.display()
        );

        let linter = Linter::default();
        let diagnostics = linter.run(&module, &config)?;

        if diagnostics.is_empty() && self.args.format == OutputFormat::Human {
            ui.success("No issues found");
        } else {
            ui.message(&self.format_output(&linter, &diagnostics)?);
        }

        let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
        let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

        if has_errors || (self.args.strict && has_warnings) {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
