//! Terraform module linting.
//!
//! The lint system consists of:
//!
//! - **Rules** - Individual checks ([`LintRule`] trait)
//! - **Runner** - Read access to the module under inspection ([`Runner`])
//! - **Registry** - Collection of all available rules ([`RuleRegistry`])
//! - **Linter** - Runs the enabled rules with config overrides ([`Linter`])
//! - **Diagnostics** - Findings with severity and location ([`LintDiagnostic`])
//!
//! # Example
//!
//! ```
//! use tfstyle::config::Config;
//! use tfstyle::hcl::Module;
//! use tfstyle::lint::Linter;
//!
//! let module = Module::from_sources([(
//!     "main.tf",
//!     "locals {\n  tags = {}\n}\nvariable \"Bad-Name\" {\n  type = string\n}\n",
//! )])?;
//! let diagnostics = Linter::default().run(&module, &Config::default())?;
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].rule_id.as_str(), "terraform_naming_standards");
//! # Ok::<(), tfstyle::TfstyleError>(())
//! ```

pub mod diagnostic;
pub mod linter;
pub mod output;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod runner;
pub mod span;

pub use diagnostic::LintDiagnostic;
pub use linter::Linter;
pub use output::{HumanFormatter, JsonFormatter, LintFormatter, OutputFormat, SarifFormatter};
pub use registry::RuleRegistry;
pub use rule::{LintRule, RuleId, Severity};
pub use rules::{
    AnyTypeVariablesRule, MetaArgumentsRule, ModuleDependenciesRule, NamingStandardsRule,
    RequiredTagsRule,
};
pub use runner::{decode_rule_config, IssueSink, ModuleRunner, Runner};
pub use span::Span;
