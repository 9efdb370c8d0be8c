//! Conversion from the `hcl-edit` syntax tree into the document model.
//!
//! `hcl-edit` reports byte ranges; everything here is translated to
//! 1-indexed line/column [`Span`]s once, at parse time.

use std::ops::Range;
use std::path::Path;

use hcl_edit::expr::{Expression as HclExpression, ObjectKey, TraversalOperator};
use hcl_edit::structure::{Attribute as HclAttribute, Block as HclBlock, BlockLabel, Body as HclBody};
use hcl_edit::template::Element;
use hcl_edit::Span as _;

use super::expr::{
    ExprKind, Expression, FunctionCall, ObjectItem, TemplatePart, Traversal, TraversalStep, Value,
};
use super::model::{Attribute, Block, Body};
use crate::error::{Result, TfstyleError};
use crate::lint::Span;

/// Parse HCL source text into a [`Body`].
pub fn parse_body(path: &Path, text: &str) -> Result<Body> {
    let parsed = hcl_edit::parser::parse_body(text).map_err(|e| TfstyleError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let converter = Converter {
        path,
        index: LineIndex::new(text),
    };
    let fallback = Span::point(path, 1, 1);
    Ok(converter.body(&parsed, &fallback))
}

/// Maps byte offsets to line/column positions.
pub(crate) struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// 1-indexed (line, column) of a byte offset. Columns count characters.
    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        let col = self
            .text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        (line + 1, col + 1)
    }

    /// End offset of `range` with trailing whitespace dropped.
    fn trim_end(&self, range: &Range<usize>) -> usize {
        self.text
            .get(range.start..range.end)
            .map(|s| range.start + s.trim_end().len())
            .unwrap_or(range.end)
    }
}

struct Converter<'a> {
    path: &'a Path,
    index: LineIndex<'a>,
}

impl Converter<'_> {
    fn span(&self, range: &Range<usize>) -> Span {
        let end = self.index.trim_end(range);
        let (start_line, start_col) = self.index.position(range.start);
        let (end_line, end_col) = self.index.position(end);
        Span::new(self.path, start_line, start_col, end_line, end_col)
    }

    fn span_or(&self, range: Option<Range<usize>>, fallback: &Span) -> Span {
        range
            .map(|r| self.span(&r))
            .unwrap_or_else(|| fallback.clone())
    }

    fn body(&self, body: &HclBody, fallback: &Span) -> Body {
        let mut result = Body::default();
        for attr in body.attributes() {
            let attr = self.attribute(attr, fallback);
            result.attributes.entry(attr.name.clone()).or_insert(attr);
        }
        for block in body.blocks() {
            result.blocks.push(self.block(block, fallback));
        }
        result
    }

    fn attribute(&self, attr: &HclAttribute, fallback: &Span) -> Attribute {
        let whole = self.span_or(attr.span(), fallback);
        let expr = self.expression(&attr.value, &whole);
        let span = match (attr.key.span(), attr.value.span()) {
            (Some(key), Some(value)) => self.span(&(key.start..value.end)),
            _ => whole,
        };

        Attribute {
            name: attr.key.value().as_str().to_string(),
            expr,
            span,
        }
    }

    fn block(&self, block: &HclBlock, fallback: &Span) -> Block {
        let span = self.span_or(block.span(), fallback);
        let ident = block.ident.span();
        let last_label = block.labels.last().and_then(label_span);
        let def_span = match (ident, last_label) {
            (Some(start), Some(end)) => self.span(&(start.start..end.end)),
            (Some(start), None) => self.span(&start),
            _ => span.clone(),
        };

        Block {
            kind: block.ident.value().as_str().to_string(),
            labels: block.labels.iter().map(label_text).collect(),
            def_span,
            body: self.body(&block.body, &span),
            span,
        }
    }

    fn expression(&self, expr: &HclExpression, fallback: &Span) -> Expression {
        let span = self.span_or(expr.span(), fallback);
        let kind = match expr {
            HclExpression::Null(_) => ExprKind::Literal(Value::Null),
            HclExpression::Bool(b) => ExprKind::Literal(Value::Bool(*b.value())),
            HclExpression::Number(n) => ExprKind::Literal(
                n.value()
                    .as_f64()
                    .map(Value::Number)
                    .unwrap_or(Value::Unknown),
            ),
            HclExpression::String(s) => ExprKind::Literal(Value::String(s.value().clone())),
            HclExpression::Array(array) => {
                ExprKind::Tuple(array.iter().map(|e| self.expression(e, &span)).collect())
            }
            HclExpression::Object(object) => ExprKind::Object(
                object
                    .iter()
                    .map(|(key, value)| ObjectItem {
                        key: self.object_key(key, &span),
                        value: self.expression(value.expr(), &span),
                    })
                    .collect(),
            ),
            HclExpression::StringTemplate(template) => {
                ExprKind::Template(self.template(template.iter(), &span))
            }
            HclExpression::HeredocTemplate(heredoc) => {
                ExprKind::Template(self.template(heredoc.template.iter(), &span))
            }
            HclExpression::Parenthesis(inner) => return self.expression(inner.inner(), &span),
            HclExpression::Variable(var) => ExprKind::Traversal(Traversal {
                root: var.value().as_str().to_string(),
                path: Vec::new(),
            }),
            HclExpression::Traversal(traversal) => match &traversal.expr {
                HclExpression::Variable(root) => ExprKind::Traversal(Traversal {
                    root: root.value().as_str().to_string(),
                    path: traversal
                        .operators
                        .iter()
                        .map(|op| self.traversal_step(op.value(), &span))
                        .collect(),
                }),
                _ => ExprKind::Opaque,
            },
            HclExpression::FuncCall(call) => {
                let mut name: Vec<&str> = call
                    .name
                    .namespace
                    .iter()
                    .map(|ns| ns.value().as_str())
                    .collect();
                name.push(call.name.name.value().as_str());
                ExprKind::FunctionCall(FunctionCall {
                    name: name.join("::"),
                    args: call.args.iter().map(|a| self.expression(a, &span)).collect(),
                })
            }
            HclExpression::Conditional(_)
            | HclExpression::UnaryOp(_)
            | HclExpression::BinaryOp(_)
            | HclExpression::ForExpr(_) => ExprKind::Opaque,
        };
        Expression::new(kind, span)
    }

    fn object_key(&self, key: &ObjectKey, fallback: &Span) -> Expression {
        match key {
            ObjectKey::Ident(ident) => Expression::new(
                ExprKind::Traversal(Traversal {
                    root: ident.value().as_str().to_string(),
                    path: Vec::new(),
                }),
                self.span_or(ident.span(), fallback),
            ),
            ObjectKey::Expression(expr) => self.expression(expr, fallback),
        }
    }

    fn traversal_step(&self, op: &TraversalOperator, fallback: &Span) -> TraversalStep {
        match op {
            TraversalOperator::GetAttr(name) => {
                TraversalStep::Attr(name.value().as_str().to_string())
            }
            TraversalOperator::Index(expr) => TraversalStep::Index(self.expression(expr, fallback)),
            TraversalOperator::LegacyIndex(index) => TraversalStep::Index(Expression::new(
                ExprKind::Literal(Value::Number(*index.value() as f64)),
                self.span_or(index.span(), fallback),
            )),
            TraversalOperator::AttrSplat(_) | TraversalOperator::FullSplat(_) => {
                TraversalStep::Splat
            }
        }
    }

    fn template<'e>(
        &self,
        elements: impl Iterator<Item = &'e Element>,
        fallback: &Span,
    ) -> Vec<TemplatePart> {
        elements
            .map(|element| match element {
                Element::Literal(text) => TemplatePart::Literal(text.value().clone()),
                Element::Interpolation(interp) => {
                    TemplatePart::Interpolation(self.expression(&interp.expr, fallback))
                }
                Element::Directive(_) => TemplatePart::Directive,
            })
            .collect()
    }
}

fn label_text(label: &BlockLabel) -> String {
    match label {
        BlockLabel::String(s) => s.value().to_string(),
        BlockLabel::Ident(ident) => ident.value().as_str().to_string(),
    }
}

fn label_span(label: &BlockLabel) -> Option<Range<usize>> {
    match label {
        BlockLabel::String(s) => s.span(),
        BlockLabel::Ident(ident) => ident.span(),
    }
}
