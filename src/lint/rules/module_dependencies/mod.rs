//! Module source pinning.
//!
//! Every `git` or `hg` module source must be pinned with `?ref=` or `?rev=`.
//! The pin is then checked against the configured style:
//!
//! - `flexible`: any pin other than one of `default_branches`
//! - `semver`: the pin must be a semantic version (`v1.2.3`, `1.2`, `2.0.0-rc.1`)
//!
//! ```yaml
//! rules:
//!   terraform_module_dependencies:
//!     style: flexible
//!     default_branches: [main, master]
//! ```

pub mod locator;

use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, TfstyleError};
use crate::hcl::{Block, BlockSchema, BodySchema, Value};
use crate::lint::runner::{decode_rule_config, IssueSink, Runner};
use crate::lint::span::Span;
use crate::lint::{LintRule, RuleId, Severity};

/// Checks that git/hg module sources are pinned according to policy.
pub struct ModuleDependenciesRule;

/// Options for [`ModuleDependenciesRule`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyConfig {
    /// `flexible` or `semver`.
    pub style: String,
    /// Branch names a `flexible` pin may not use.
    pub default_branches: Vec<String>,
}

/// Pin policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Any pin except a default branch.
    Flexible,
    /// Pins must be semantic versions.
    Semver,
}

impl DependencyConfig {
    /// The configured style. `Ok(None)` when unset.
    pub fn style(&self) -> std::result::Result<Option<Style>, String> {
        match self.style.as_str() {
            "" => Ok(None),
            "flexible" => Ok(Some(Style::Flexible)),
            "semver" => Ok(Some(Style::Semver)),
            other => Err(invalid_style(other)),
        }
    }
}

fn invalid_style(style: &str) -> String {
    format!("invalid style '{}', expected 'semver' or 'flexible'", style)
}

/// Which query parameter pins the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Ref,
    Rev,
}

impl PinKind {
    fn as_str(self) -> &'static str {
        match self {
            PinKind::Ref => "ref",
            PinKind::Rev => "rev",
        }
    }
}

/// What a module source resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Not a git/hg source; nothing to check.
    Skipped,
    /// Missing or empty host.
    InvalidUrl,
    /// No `ref`/`rev` pin.
    Unpinned,
    /// Pinned to `value` via `kind`.
    Pinned { kind: PinKind, value: String },
}

/// Classify a detected locator.
pub fn classify(locator: &str) -> Reference {
    let scheme = locator
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();
    if scheme != "git" && scheme != "hg" {
        return Reference::Skipped;
    }

    let Ok(mut url) = Url::parse(locator) else {
        return Reference::InvalidUrl;
    };

    if url.cannot_be_a_base() {
        let opaque = url.path();
        let inner = opaque.strip_prefix(':').unwrap_or(opaque);
        // `https:///path` would otherwise parse with the first path segment as host.
        if inner
            .split_once("://")
            .is_some_and(|(_, rest)| rest.is_empty() || rest.starts_with(['/', '?', '#']))
        {
            return Reference::InvalidUrl;
        }
        let Ok(mut inner) = Url::parse(inner) else {
            return Reference::InvalidUrl;
        };
        inner.set_query(url.query());
        url = inner;
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Reference::InvalidUrl;
    }

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    if let Some(value) = query("ref") {
        Reference::Pinned {
            kind: PinKind::Ref,
            value,
        }
    } else if let Some(value) = query("rev") {
        Reference::Pinned {
            kind: PinKind::Rev,
            value,
        }
    } else {
        Reference::Unpinned
    }
}

/// Lenient semantic version check: optional `v`, missing minor/patch allowed.
pub fn is_semantic_version(version: &str) -> bool {
    let version = version.strip_prefix('v').unwrap_or(version);
    let split = version.find(|c| c == '-' || c == '+').unwrap_or(version.len());
    let (core, suffix) = version.split_at(split);

    let parts = core.split('.').count();
    if parts > 3 {
        return false;
    }

    let mut padded = core.to_string();
    for _ in parts..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    semver::Version::parse(&padded).is_ok()
}

impl ModuleDependenciesRule {
    fn check_module(
        &self,
        runner: &dyn Runner,
        config: &DependencyConfig,
        style: Option<Style>,
        block: &Block,
        sink: &mut dyn IssueSink,
    ) -> Result<()> {
        let Some(source) = block.body.attribute("source") else {
            return Ok(());
        };

        let raw = match runner.evaluate(&source.expr)? {
            Value::String(s) => s,
            other => {
                return Err(TfstyleError::evaluation(format!(
                    "module '{}' source must be a string, got {}",
                    block.name(),
                    other.type_name()
                )))
            }
        };

        let pwd = source
            .span
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let locator = locator::detect(&raw, pwd).map_err(anyhow::Error::new)?;
        debug!("Module '{}' source '{}' detected as '{}'", block.name(), raw, locator);

        let span = &source.expr.span;
        let prefix = format!("module '{}' source '{}'", block.name(), raw);

        let (kind, value) = match classify(&locator) {
            Reference::Skipped => return Ok(()),
            Reference::InvalidUrl => {
                return self.emit(sink, format!("{} is not a valid URL", prefix), span)
            }
            Reference::Unpinned => {
                return sink.emit(
                    self.diagnostic(
                        format!(
                            "{} is not pinned (missing ?ref= or ?rev= in the URL).",
                            prefix
                        ),
                        span.clone(),
                    )
                    .with_suggestion("append ?ref=<tag> to the source"),
                )
            }
            Reference::Pinned { kind, value } => (kind, value),
        };

        match style {
            Some(Style::Flexible) => {
                for branch in config.default_branches.iter().filter(|b| **b == value) {
                    self.emit(
                        sink,
                        format!(
                            "{} uses a default branch as {} ({})",
                            prefix,
                            kind.as_str(),
                            branch
                        ),
                        span,
                    )?;
                }
                Ok(())
            }
            Some(Style::Semver) => {
                if is_semantic_version(&value) {
                    return Ok(());
                }
                self.emit(
                    sink,
                    format!(
                        "{} uses a {} which is not a semantic version string",
                        prefix,
                        kind.as_str()
                    ),
                    span,
                )
            }
            None => Err(TfstyleError::rule_config(
                self.id().as_str(),
                invalid_style(""),
            )),
        }
    }

    fn emit(&self, sink: &mut dyn IssueSink, message: String, span: &Span) -> Result<()> {
        sink.emit(self.diagnostic(message, span.clone()))
    }
}

impl LintRule for ModuleDependenciesRule {
    fn id(&self) -> RuleId {
        RuleId::new("terraform_module_dependencies")
    }

    fn name(&self) -> &str {
        "Module Dependencies"
    }

    fn description(&self) -> &str {
        "Requires git/hg module sources to be pinned to a non-default branch or a semantic version"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()> {
        let config: DependencyConfig = decode_rule_config(runner, &self.id())?;
        let style = config
            .style()
            .map_err(|message| TfstyleError::rule_config(self.id().as_str(), message))?;
        if style.is_none() {
            debug!("No style configured for {}", self.id());
        }

        let content = runner.module_content(
            &BodySchema::new().block(
                BlockSchema::new("module")
                    .labels(&["name"])
                    .body(BodySchema::new().attributes(&["source"])),
            ),
        )?;

        for block in &content.blocks {
            self.check_module(runner, &config, style, block, sink)?;
        }
        Ok(())
    }
}
