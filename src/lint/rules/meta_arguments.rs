//! Meta-argument arrangement.
//!
//! Meta-arguments must open a block, in a fixed order, each followed by a
//! blank line:
//!
//! ```hcl
//! module "vpc" {
//!   source = "./vpc"
//!
//!   count = 2
//!
//!   providers = { aws = aws.east }
//!
//!   cidr = "10.0.0.0/16"
//! }
//! ```
//!
//! In resources and data sources a `lifecycle` block must close the block.

use tracing::debug;

use crate::error::Result;
use crate::hcl::{Attribute, Block, BlockSchema, BodySchema};
use crate::lint::runner::{IssueSink, Runner};
use crate::lint::span::Span;
use crate::lint::{LintRule, RuleId, Severity};

/// Checks the order and spacing of `source`, `count`/`for_each`, `provider(s)` and `lifecycle`.
pub struct MetaArgumentsRule;

/// Walk state for one block: where the next meta-argument must start from,
/// and the lowest meta-argument seen so far.
struct Arrangement<'a> {
    anchor: Span,
    last: Option<&'a Attribute>,
}

impl<'a> Arrangement<'a> {
    fn new(block: &Block) -> Self {
        Self {
            anchor: block.def_span.clone(),
            last: None,
        }
    }

    /// Accept `attr` if it starts exactly `offset` lines after the anchor.
    fn advance(&mut self, attr: &'a Attribute, offset: usize) -> bool {
        if self.anchor.end_line + offset != attr.span.start_line {
            return false;
        }
        self.anchor = attr.span.clone();
        if self
            .last
            .map_or(true, |last| attr.span.start_line > last.span.start_line)
        {
            self.last = Some(attr);
        }
        true
    }
}

impl MetaArgumentsRule {
    fn schema() -> BodySchema {
        let resource_body = || {
            BodySchema::new()
                .attributes(&["count", "for_each", "provider"])
                .block(BlockSchema::new("lifecycle"))
        };

        BodySchema::new()
            .block(
                BlockSchema::new("module").labels(&["name"]).body(
                    BodySchema::new().attributes(&["source", "count", "for_each", "providers"]),
                ),
            )
            .block(
                BlockSchema::new("resource")
                    .labels(&["type", "name"])
                    .body(resource_body()),
            )
            .block(
                BlockSchema::new("data")
                    .labels(&["type", "name"])
                    .body(resource_body()),
            )
    }

    fn check_block(
        &self,
        runner: &dyn Runner,
        block: &Block,
        sink: &mut dyn IssueSink,
    ) -> Result<()> {
        let is_module = block.kind == "module";
        let mut arrangement = Arrangement::new(block);

        let source = if is_module {
            block.body.attribute("source")
        } else {
            None
        };
        if let Some(attr) = source {
            if !arrangement.advance(attr, 1) {
                return self.misplaced(block, attr, sink);
            }
        }

        let iteration = block
            .body
            .attribute("count")
            .or_else(|| block.body.attribute("for_each"));
        if let Some(attr) = iteration {
            let offset = if source.is_some() { 2 } else { 1 };
            if !arrangement.advance(attr, offset) {
                return self.misplaced(block, attr, sink);
            }
        }

        let provider = block
            .body
            .attribute(if is_module { "providers" } else { "provider" });
        if let Some(attr) = provider {
            let offset = if source.is_some() || iteration.is_some() {
                2
            } else {
                1
            };
            if !arrangement.advance(attr, offset) {
                return self.misplaced(block, attr, sink);
            }
        }

        if let Some(last) = arrangement.last {
            let file = runner.file(&last.span.file)?;
            let next = file.lines().get(last.span.end_line).copied().unwrap_or("");
            if !next.trim().is_empty() {
                sink.emit(self.diagnostic(
                    format!(
                        "Missing new line after '{}' in {} '{}'",
                        last.name,
                        block.kind,
                        block.display_name()
                    ),
                    last.span.clone(),
                ))?;
            }
        }

        if !is_module {
            if let Some(lifecycle) = block.body.blocks_of_kind("lifecycle").next() {
                if lifecycle.span.end_line + 1 != block.span.end_line {
                    sink.emit(self.diagnostic(
                        format!(
                            "Invalid 'lifecycle' argument arrangement in {} '{}'",
                            block.kind,
                            block.display_name()
                        ),
                        lifecycle.span.clone(),
                    ))?;
                }
            }
        }

        Ok(())
    }

    fn misplaced(&self, block: &Block, attr: &Attribute, sink: &mut dyn IssueSink) -> Result<()> {
        sink.emit(self.diagnostic(
            format!(
                "Invalid '{}' argument arrangement in {} '{}'",
                attr.name,
                block.kind,
                block.display_name()
            ),
            attr.span.clone(),
        ))
    }
}

impl LintRule for MetaArgumentsRule {
    fn id(&self) -> RuleId {
        RuleId::new("terraform_meta_arguments")
    }

    fn name(&self) -> &str {
        "Meta Arguments"
    }

    fn description(&self) -> &str {
        "Enforces the order and spacing of meta-arguments and lifecycle blocks"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()> {
        let content = runner.module_content(&Self::schema())?;
        debug!("Checking meta-arguments of {} blocks", content.blocks.len());

        for block in &content.blocks {
            self.check_block(runner, block, sink)?;
        }
        Ok(())
    }
}
