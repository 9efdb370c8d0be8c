//! Schema-filtered views over a parsed body.
//!
//! Rules describe the blocks and attributes they care about with a
//! [`BodySchema`]; [`BodySchema::filter`] returns a body holding exactly
//! those constructs, so each rule sees a minimal tree.

use super::model::{Block, Body};
use crate::error::{Result, TfstyleError};

/// The attributes and nested blocks a rule wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    /// Attribute names to keep.
    pub attributes: Vec<&'static str>,
    /// Nested block types to keep.
    pub blocks: Vec<BlockSchema>,
}

/// A nested block type and the shape of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSchema {
    /// Block type.
    pub kind: &'static str,
    /// Names of the labels the block must carry.
    pub label_names: Vec<&'static str>,
    /// Schema applied to the block body.
    pub body: BodySchema,
}

impl BodySchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the given attributes.
    pub fn attributes(mut self, names: &[&'static str]) -> Self {
        self.attributes.extend_from_slice(names);
        self
    }

    /// Keep blocks matching `block`.
    pub fn block(mut self, block: BlockSchema) -> Self {
        self.blocks.push(block);
        self
    }

    /// Filter `body` down to this schema.
    ///
    /// Returns a [`TfstyleError::Schema`] when a kept block has the wrong number of labels.
    pub fn filter(&self, body: &Body) -> Result<Body> {
        let mut result = Body::default();

        for name in &self.attributes {
            if let Some(attr) = body.attributes.get(*name) {
                result.attributes.insert(attr.name.clone(), attr.clone());
            }
        }

        for block in &body.blocks {
            let Some(schema) = self.blocks.iter().find(|s| s.kind == block.kind) else {
                continue;
            };
            result.blocks.push(schema.filter(block)?);
        }

        Ok(result)
    }
}

impl BlockSchema {
    /// A block type with no labels and an empty body schema.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            label_names: Vec::new(),
            body: BodySchema::default(),
        }
    }

    /// Require labels with these names.
    pub fn labels(mut self, names: &[&'static str]) -> Self {
        self.label_names = names.to_vec();
        self
    }

    /// Apply `body` to the block contents.
    pub fn body(mut self, body: BodySchema) -> Self {
        self.body = body;
        self
    }

    fn filter(&self, block: &Block) -> Result<Block> {
        if block.labels.len() != self.label_names.len() {
            let message = if block.labels.len() > self.label_names.len() {
                format!(
                    "Extraneous label for {}: only {} label(s) expected ({})",
                    self.kind,
                    self.label_names.len(),
                    self.label_names.join(", ")
                )
            } else {
                format!(
                    "Missing name for {}: all {} blocks must have {} label(s) ({})",
                    self.kind,
                    self.kind,
                    self.label_names.len(),
                    self.label_names.join(", ")
                )
            };
            return Err(TfstyleError::Schema {
                path: block.def_span.file.clone(),
                message: format!("{}: {}", block.def_span, message),
            });
        }

        Ok(Block {
            kind: block.kind.clone(),
            labels: block.labels.clone(),
            def_span: block.def_span.clone(),
            span: block.span.clone(),
            body: self.body.filter(&block.body)?,
        })
    }
}
