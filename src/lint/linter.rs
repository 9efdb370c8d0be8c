//! Runs the enabled rules of a registry over a module.

use tracing::debug;

use super::diagnostic::LintDiagnostic;
use super::registry::RuleRegistry;
use super::rule::RuleId;
use super::runner::ModuleRunner;
use crate::config::Config;
use crate::error::{Result, TfstyleError};
use crate::hcl::Module;

/// Applies a [`RuleRegistry`] to modules.
pub struct Linter {
    registry: RuleRegistry,
}

impl Linter {
    /// Create a linter over `registry`.
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// The rules this linter knows.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every enabled rule over `module`, in rule id order.
    ///
    /// Configured severities replace the rule defaults. A rule name in
    /// `config` that no registered rule has is a configuration error.
    pub fn run(&self, module: &Module, config: &Config) -> Result<Vec<LintDiagnostic>> {
        if let Some(unknown) = config
            .rules
            .keys()
            .find(|name| self.registry.get(&RuleId::new(name.as_str())).is_none())
        {
            return Err(TfstyleError::rule_config(unknown, "unknown rule"));
        }

        let runner = ModuleRunner::new(module, config);
        let mut diagnostics = Vec::new();

        for rule in self.registry.iter() {
            let id = rule.id();
            let settings = config.rule(id.as_str());

            let enabled = settings
                .and_then(|s| s.enabled)
                .unwrap_or_else(|| rule.enabled_by_default());
            if !enabled {
                debug!("Skipping disabled rule {}", id);
                continue;
            }

            let mut found = Vec::new();
            rule.check(&runner, &mut found)?;
            debug!("Rule {} reported {} issue(s)", id, found.len());

            match settings.and_then(|s| s.severity) {
                Some(severity) => {
                    diagnostics.extend(found.into_iter().map(|d| d.with_severity(severity)))
                }
                None => diagnostics.extend(found),
            }
        }

        Ok(diagnostics)
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(RuleRegistry::with_builtins())
    }
}
