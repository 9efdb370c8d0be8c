//! tfstyle - Style, layout and dependency-pinning lint rules for Terraform modules.
//!
//! tfstyle loads every `*.tf` file of a module directory and runs a set of
//! rules over it: meta-argument layout, variable naming, module source
//! pinning, required resource tags and explicit variable types.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.tfstyle.yml` loading and per-rule settings
//! - [`error`] - Error types and result aliases
//! - [`hcl`] - HCL parsing, module loading, schemas and evaluation
//! - [`lint`] - Rules, runner, linter and output formatters
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use tfstyle::config::parse_config;
//! use tfstyle::hcl::Module;
//! use tfstyle::lint::Linter;
//! use std::path::Path;
//!
//! let module = Module::from_sources([(
//!     "main.tf",
//!     "locals {\n  tags = { env = \"prod\" }\n}\n\nresource \"aws_s3_bucket\" \"logs\" {\n  tags = local.tags\n}\n",
//! )])?;
//! let config = parse_config(
//!     "rules:\n  terraform_required_tags:\n    tags: [env]\n",
//!     Path::new(".tfstyle.yml"),
//! )?;
//!
//! let diagnostics = Linter::default().run(&module, &config)?;
//! assert_eq!(
//!     diagnostics[0].message,
//!     "aws_s3_bucket 'logs' is missing required tag: Name"
//! );
//! # Ok::<(), tfstyle::TfstyleError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod hcl;
pub mod lint;
pub mod ui;

pub use error::{Result, TfstyleError};
