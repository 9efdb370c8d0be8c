//! Lint rule definitions.
//!
//! This module provides the core traits and types for defining lint rules:
//!
//! - [`LintRule`] - The trait that all lint rules must implement
//! - [`RuleId`] - Unique identifier for a lint rule
//! - [`Severity`] - Severity level for diagnostics (Hint, Warning, Error)

use serde::{Deserialize, Serialize};

use super::diagnostic::LintDiagnostic;
use super::runner::{IssueSink, Runner};
use super::span::Span;
use crate::error::Result;

/// Unique identifier for a lint rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create a new rule ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity level for lint diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational hint, does not affect validity.
    Hint,
    /// Warning that should be addressed.
    Warning,
    /// Error that fails the check.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A lint rule that validates a Terraform module.
///
/// Rules read the module through a [`Runner`] and report findings to an
/// [`IssueSink`]. Returning an error aborts the rule; findings are never
/// errors.
pub trait LintRule: Send + Sync {
    /// Unique identifier for this rule.
    fn id(&self) -> RuleId;

    /// Human-readable name of the rule.
    fn name(&self) -> &str;

    /// Description of what this rule checks.
    fn description(&self) -> &str;

    /// Default severity for this rule.
    fn default_severity(&self) -> Severity;

    /// Whether the rule runs without being enabled in the config file.
    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Check the module and emit any findings.
    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()>;

    /// A diagnostic for this rule at its default severity.
    fn diagnostic(&self, message: String, span: Span) -> LintDiagnostic {
        LintDiagnostic::new(self.id(), self.default_severity(), message).with_span(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_id_equality() {
        let id1 = RuleId::new("test_rule");
        let id2 = RuleId::new("test_rule");
        let id3 = RuleId::new("other_rule");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn rule_id_display() {
        let id = RuleId::new("terraform_meta_arguments");
        assert_eq!(format!("{}", id), "terraform_meta_arguments");
        assert_eq!(id.as_str(), "terraform_meta_arguments");
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Hint < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Hint), "hint");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Error), "error");
    }

    #[test]
    fn severity_deserializes_lowercase() {
        let severity: Severity = serde_yaml::from_str("error").unwrap();
        assert_eq!(severity, Severity::Error);
        assert!(serde_yaml::from_str::<Severity>("fatal").is_err());
    }
}
