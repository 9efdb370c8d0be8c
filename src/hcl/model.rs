//! Blocks, attributes and bodies.

use std::collections::BTreeMap;

use super::expr::Expression;
use crate::lint::Span;

/// A `name = expression` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// The value expression.
    pub expr: Expression,
    /// Span from the start of the name to the end of the value.
    pub span: Span,
}

/// A typed, labeled block such as `resource "aws_s3_bucket" "logs" { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block type (`module`, `resource`, `variable`, ...).
    pub kind: String,
    /// Labels in declaration order.
    pub labels: Vec<String>,
    /// Span of the type keyword through the last label.
    pub def_span: Span,
    /// Span of the whole block, through its closing brace.
    pub span: Span,
    /// Block contents.
    pub body: Body,
}

/// The contents of a block or file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// Attributes by name.
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested blocks in source order.
    pub blocks: Vec<Block>,
}

impl Block {
    /// Labels joined with `.`, as used in messages (`aws_s3_bucket.logs`).
    pub fn display_name(&self) -> String {
        self.labels.join(".")
    }

    /// The first label, usually the declared name.
    pub fn name(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or_default()
    }
}

impl Body {
    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Nested blocks of the given type.
    pub fn blocks_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: &str, labels: &[&str]) -> Block {
        Block {
            kind: kind.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            def_span: Span::new("main.tf", 1, 1, 1, 10),
            span: Span::new("main.tf", 1, 1, 3, 2),
            body: Body::default(),
        }
    }

    #[test]
    fn display_name_joins_labels() {
        assert_eq!(
            block("resource", &["aws_s3_bucket", "logs"]).display_name(),
            "aws_s3_bucket.logs"
        );
        assert_eq!(block("locals", &[]).display_name(), "");
    }

    #[test]
    fn name_is_first_label() {
        assert_eq!(block("variable", &["region"]).name(), "region");
        assert_eq!(block("locals", &[]).name(), "");
    }

    #[test]
    fn blocks_of_kind_filters() {
        let body = Body {
            attributes: BTreeMap::new(),
            blocks: vec![
                block("lifecycle", &[]),
                block("dynamic", &["tag"]),
                block("lifecycle", &[]),
            ],
        };

        assert_eq!(body.blocks_of_kind("lifecycle").count(), 2);
    }
}
