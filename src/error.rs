//! Error types for tfstyle operations.
//!
//! This module defines [`TfstyleError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Rule findings are never errors; they are reported as diagnostics
//! - Use `TfstyleError` for failures that must abort a check (bad rule
//!   configuration, unparsable HCL, failed evaluation, failed emission)
//! - Use `anyhow::Error` (via `TfstyleError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tfstyle operations.
#[derive(Debug, Error)]
pub enum TfstyleError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid options for a single rule (unknown format, bad regex, bad style...).
    #[error("Invalid configuration for rule '{rule}': {message}")]
    RuleConfig { rule: String, message: String },

    /// HCL syntax error in a module file.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A block does not fit the schema a rule requested.
    #[error("{path}: {message}")]
    Schema { path: PathBuf, message: String },

    /// An expression could not be evaluated.
    #[error("Failed to evaluate expression: {message}")]
    Evaluation { message: String },

    /// A raw file was requested that is not part of the loaded module.
    #[error("File is not part of the module: {path}")]
    FileNotLoaded { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TfstyleError {
    /// Shorthand for a [`TfstyleError::RuleConfig`] error.
    pub fn rule_config(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleConfig {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`TfstyleError::Evaluation`] error.
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }
}

/// Result type alias for tfstyle operations.
pub type Result<T> = std::result::Result<T, TfstyleError>;
