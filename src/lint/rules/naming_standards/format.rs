//! Name format resolution.
//!
//! A format is either a custom regular expression, a user-registered named
//! format from `custom_formats`, or one of the built-in formats. `none`
//! disables validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").unwrap());

static MIXED_SNAKE_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*(_[a-zA-Z0-9]+)*$").unwrap());

/// Format name that disables validation.
pub const FORMAT_NONE: &str = "none";

/// A user-registered named format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomFormat {
    /// The regular expression names must match.
    pub regex: String,
    /// Label shown in messages.
    pub description: String,
}

/// Why a format could not be resolved.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Neither a custom nor a built-in format has this name.
    #[error("`{0}` is unsupported format")]
    Unsupported(String),

    /// The expression is not a valid regular expression.
    #[error("invalid regular expression `{expression}`: {source}")]
    InvalidRegex {
        expression: String,
        #[source]
        source: regex::Error,
    },
}

/// Validates names against a compiled format.
#[derive(Debug, Clone)]
pub struct NameValidator {
    regex: Regex,
    format: String,
    is_named_format: bool,
}

impl NameValidator {
    /// The format name, custom format description, or expression text.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// `format` for named formats, `RegExp` for raw expressions.
    pub fn kind(&self) -> &'static str {
        if self.is_named_format {
            "format"
        } else {
            "RegExp"
        }
    }

    /// Whether the last `.`-separated segment of `name` matches.
    pub fn is_valid(&self, name: &str) -> bool {
        let leaf = name.rsplit('.').next().unwrap_or(name);
        self.regex.is_match(leaf)
    }

    fn compile(is_named_format: bool, format: &str, expression: &str) -> Result<Self, FormatError> {
        let regex = Regex::new(expression).map_err(|source| FormatError::InvalidRegex {
            expression: expression.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            format: format.to_string(),
            is_named_format,
        })
    }
}

fn predefined(name: &str) -> Option<&'static Regex> {
    match name.to_lowercase().as_str() {
        "snake_case" => Some(&*SNAKE_CASE),
        "mixed_snake_case" => Some(&*MIXED_SNAKE_CASE),
        _ => None,
    }
}

/// Resolve a validator from a `custom` expression and a `format` name.
///
/// Returns `Ok(None)` when validation is disabled.
pub fn resolve(
    custom: &str,
    format: &str,
    custom_formats: &BTreeMap<String, CustomFormat>,
) -> Result<Option<NameValidator>, FormatError> {
    if !custom.is_empty() {
        return NameValidator::compile(false, custom, custom).map(Some);
    }

    if format == FORMAT_NONE {
        return Ok(None);
    }

    if let Some(named) = custom_formats.get(format) {
        return NameValidator::compile(true, &named.description, &named.regex).map(Some);
    }

    match predefined(format) {
        Some(regex) => Ok(Some(NameValidator {
            regex: regex.clone(),
            format: format.to_string(),
            is_named_format: true,
        })),
        None => Err(FormatError::Unsupported(format.to_string())),
    }
}
