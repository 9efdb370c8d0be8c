//! HCL document model.
//!
//! Configuration files are parsed with `hcl-edit` and converted once into a
//! small typed model ([`Block`], [`Attribute`], [`Expression`]) carrying
//! line/column spans. Rules work exclusively on this model.

pub mod eval;
pub mod expr;
pub mod model;
pub mod module;
pub mod parse;
pub mod schema;

pub use eval::Evaluator;
pub use expr::{
    ExprKind, Expression, FunctionCall, ObjectItem, TemplatePart, Traversal, TraversalStep, Value,
};
pub use model::{Attribute, Block, Body};
pub use module::{Module, SourceFile};
pub use parse::parse_body;
pub use schema::{BlockSchema, BodySchema};
