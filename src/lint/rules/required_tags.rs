//! Required resource tags.
//!
//! Resources must carry every required tag key, either directly or through
//! `merge(local.tags, {...})`. The module must declare `local.tags`.
//! AWS resources additionally need a `Name` tag.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::hcl::{Attribute, Block, BlockSchema, BodySchema, ExprKind, Value};
use crate::lint::runner::{decode_rule_config, IssueSink, Runner};
use crate::lint::span::Span;
use crate::lint::{LintRule, RuleId, Severity};

/// Tags required when none are configured.
pub const DEFAULT_REQUIRED_TAGS: &[&str] = &[
    "brand",
    "env",
    "project",
    "devops_project_kind",
    "devops_project_group",
    "devops_project_name",
];

/// Checks that resources carry the required tags.
pub struct RequiredTagsRule;

/// Options for [`RequiredTagsRule`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequiredTagsConfig {
    /// Required tag keys; [`DEFAULT_REQUIRED_TAGS`] when empty.
    pub tags: Vec<String>,
    /// Resource types that are not checked.
    pub excluded_resources: Vec<String>,
}

impl RequiredTagsConfig {
    fn required_tags(&self) -> Vec<String> {
        if self.tags.is_empty() {
            DEFAULT_REQUIRED_TAGS.iter().map(|t| t.to_string()).collect()
        } else {
            self.tags.clone()
        }
    }
}

/// Tag keys of a resource, or why they could not be determined.
enum TagKeys {
    Keys(BTreeSet<String>),
    UnsupportedFunction(String),
    UnsupportedVariable(String),
}

fn map_keys(value: &Value) -> BTreeSet<String> {
    value.keys().unwrap_or_default().into_iter().collect()
}

impl RequiredTagsRule {
    fn local_tags(runner: &dyn Runner) -> Result<Option<Attribute>> {
        let content = runner.module_content(
            &BodySchema::new()
                .block(BlockSchema::new("locals").body(BodySchema::new().attributes(&["tags"]))),
        )?;

        Ok(content
            .blocks
            .into_iter()
            .find_map(|mut block| block.body.attributes.remove("tags")))
    }

    fn tag_keys(runner: &dyn Runner, tags: &Attribute, local_tags: &Value) -> Result<TagKeys> {
        let keys = match &tags.expr.kind {
            ExprKind::FunctionCall(call) if call.name == "merge" => {
                let mut keys = BTreeSet::new();
                for arg in &call.args {
                    match arg.as_traversal() {
                        Some(traversal) if traversal.root == "local" => {
                            keys.extend(map_keys(local_tags));
                        }
                        _ => keys.extend(map_keys(&runner.evaluate(arg)?)),
                    }
                }
                keys
            }
            ExprKind::FunctionCall(call) => return Ok(TagKeys::UnsupportedFunction(call.name.clone())),
            ExprKind::Traversal(traversal) if traversal.root == "local" => map_keys(local_tags),
            ExprKind::Traversal(traversal) => {
                return Ok(TagKeys::UnsupportedVariable(traversal.root.clone()))
            }
            _ => map_keys(&runner.evaluate(&tags.expr)?),
        };
        Ok(TagKeys::Keys(keys))
    }

    fn check_resource(
        &self,
        runner: &dyn Runner,
        resource: &Block,
        required: &[String],
        local_tags: &Value,
        sink: &mut dyn IssueSink,
    ) -> Result<()> {
        let Some(tags) = resource.body.attribute("tags") else {
            return Ok(());
        };
        let span = &tags.expr.span;
        let resource_type = resource.name();
        let resource_name = resource.labels.get(1).map(String::as_str).unwrap_or_default();

        let keys = match Self::tag_keys(runner, tags, local_tags)? {
            TagKeys::Keys(keys) => keys,
            TagKeys::UnsupportedFunction(name) => {
                return self.emit(
                    sink,
                    format!(
                        "unsupported function '{}' used in tags, only 'merge' is allowed",
                        name
                    ),
                    span,
                )
            }
            TagKeys::UnsupportedVariable(root) => {
                return self.emit(
                    sink,
                    format!(
                        "unsupported variable '{}' used in tags, only 'local.tags' is allowed",
                        root
                    ),
                    span,
                )
            }
        };

        let missing: Vec<&str> = required
            .iter()
            .filter(|tag| !keys.contains(*tag))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            self.emit(
                sink,
                format!(
                    "{} '{}' is missing required tags: [{}]",
                    resource_type,
                    resource_name,
                    missing.join(", ")
                ),
                span,
            )?;
        }

        if resource_type.starts_with("aws_") && !keys.contains("Name") {
            self.emit(
                sink,
                format!(
                    "{} '{}' is missing required tag: Name",
                    resource_type, resource_name
                ),
                span,
            )?;
        }

        Ok(())
    }

    fn emit(&self, sink: &mut dyn IssueSink, message: String, span: &Span) -> Result<()> {
        sink.emit(self.diagnostic(message, span.clone()))
    }
}

impl LintRule for RequiredTagsRule {
    fn id(&self) -> RuleId {
        RuleId::new("terraform_required_tags")
    }

    fn name(&self) -> &str {
        "Required Tags"
    }

    fn description(&self) -> &str {
        "Requires resources to carry the configured tags, and AWS resources a Name tag"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()> {
        let config: RequiredTagsConfig = decode_rule_config(runner, &self.id())?;
        let required = config.required_tags();

        let local_tags = match Self::local_tags(runner)? {
            Some(attr) => {
                let value = runner.evaluate(&attr.expr)?;
                if !matches!(value, Value::Map(_)) {
                    warn!(
                        "local.tags at {} is not a known map, skipping tag checks",
                        attr.span
                    );
                    return Ok(());
                }
                value
            }
            None => {
                let file = runner
                    .files()
                    .first()
                    .map(|f| f.path.as_path())
                    .unwrap_or_else(|| runner.dir());
                self.emit(
                    sink,
                    "missing required local variable `tags`".to_string(),
                    &Span::point(file, 1, 1),
                )?;
                Value::Unknown
            }
        };

        let content = runner.module_content(
            &BodySchema::new().block(
                BlockSchema::new("resource")
                    .labels(&["type", "name"])
                    .body(BodySchema::new().attributes(&["tags"])),
            ),
        )?;

        for resource in &content.blocks {
            if config.excluded_resources.iter().any(|r| r == resource.name()) {
                debug!("Skipping excluded resource {}", resource.display_name());
                continue;
            }
            self.check_resource(runner, resource, &required, &local_tags, sink)?;
        }

        Ok(())
    }
}
