//! Rules command implementation.
//!
//! The `tfstyle rules` command lists the built-in rules.

use crate::error::Result;
use crate::lint::RuleRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The rules command implementation.
pub struct RulesCommand {
    registry: RuleRegistry,
}

impl RulesCommand {
    /// Create a rules command listing the built-in rules.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::with_builtins(),
        }
    }
}

impl Default for RulesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for RulesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let width = self
            .registry
            .iter()
            .map(|rule| rule.id().as_str().len())
            .max()
            .unwrap_or_default();

        for rule in self.registry.iter() {
            let state = if rule.enabled_by_default() {
                ""
            } else {
                " (disabled by default)"
            };
            ui.message(&format!(
                "{:<width$}  {:<7}  {}{}",
                rule.id().as_str(),
                rule.default_severity().to_string(),
                rule.description(),
                state,
                width = width
            ));
        }

        Ok(CommandResult::success())
    }
}
