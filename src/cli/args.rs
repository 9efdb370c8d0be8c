//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::lint::OutputFormat;

/// tfstyle - Style and dependency-pinning lint rules for Terraform modules.
#[derive(Debug, Parser)]
#[command(name = "tfstyle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides <DIR>/.tfstyle.yml)
    #[arg(short, long, global = true, env = "TFSTYLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint a Terraform module (default if no command specified)
    Lint(LintArgs),

    /// List the available rules
    Rules,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `lint` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LintArgs {
    /// Module directory to lint
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Output format: human, json, sarif
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl Default for LintArgs {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: OutputFormat::Human,
            strict: false,
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_defaults() {
        let cli = Cli::try_parse_from(["tfstyle", "lint"]).unwrap();
        match cli.command {
            Some(Commands::Lint(args)) => {
                assert_eq!(args.dir, PathBuf::from("."));
                assert_eq!(args.format, OutputFormat::Human);
                assert!(!args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lint_with_options() {
        let cli = Cli::try_parse_from([
            "tfstyle",
            "lint",
            "infra/vpc",
            "--format",
            "sarif",
            "--strict",
            "--config",
            "ci.yml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("ci.yml")));
        match cli.command {
            Some(Commands::Lint(args)) => {
                assert_eq!(args.dir, PathBuf::from("infra/vpc"));
                assert_eq!(args.format, OutputFormat::Sarif);
                assert!(args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["tfstyle", "lint", "--format", "xml"]).is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["tfstyle", "--debug"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.debug);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
