//! Expression and value types.
//!
//! Only the shapes the rules inspect are modelled structurally: literals,
//! traversals (`local.tags`), function calls (`object(...)`, `merge(...)`),
//! object and tuple constructors and string templates. Every other HCL
//! expression becomes [`ExprKind::Opaque`], which rules treat as "skip".

use std::collections::BTreeMap;
use std::fmt;

use crate::lint::Span;

/// A parsed expression with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The expression shape.
    pub kind: ExprKind,
    /// Where the expression appears in the source.
    pub span: Span,
}

/// The shape of an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal value: string, number, bool or null.
    Literal(Value),
    /// A string with interpolations or directives.
    Template(Vec<TemplatePart>),
    /// A variable reference, e.g. `local.tags` or a bare `string`.
    Traversal(Traversal),
    /// A function call, e.g. `object({ ... })`.
    FunctionCall(FunctionCall),
    /// An object constructor `{ key = value, ... }`.
    Object(Vec<ObjectItem>),
    /// A tuple constructor `[a, b]`.
    Tuple(Vec<Expression>),
    /// Any expression shape the rules never look into.
    Opaque,
}

/// One piece of a string template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text.
    Literal(String),
    /// An interpolated `${...}` expression.
    Interpolation(Expression),
    /// A `%{...}` directive; never evaluated.
    Directive,
}

/// A reference rooted at a name, followed by attribute/index steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    /// The root name (`local`, `var`, `string`, ...).
    pub root: String,
    /// Steps applied to the root, in order.
    pub path: Vec<TraversalStep>,
}

/// A single traversal step.
#[derive(Debug, Clone, PartialEq)]
pub enum TraversalStep {
    /// `.name`
    Attr(String),
    /// `[expr]` or the legacy `.0`
    Index(Expression),
    /// `.*` or `[*]`
    Splat,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Function name; provider namespaces are joined with `::`.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Expression>,
}

/// One `key = value` entry of an object constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectItem {
    /// The key expression. Bare identifiers are traversals with an empty path.
    pub key: Expression,
    /// The value expression.
    pub value: Expression,
}

impl Expression {
    /// Create an expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The function call, if this is a call to `name`.
    pub fn as_call(&self, name: &str) -> Option<&FunctionCall> {
        match &self.kind {
            ExprKind::FunctionCall(call) if call.name == name => Some(call),
            _ => None,
        }
    }

    /// The object items, if this is an object constructor.
    pub fn as_object(&self) -> Option<&[ObjectItem]> {
        match &self.kind {
            ExprKind::Object(items) => Some(items),
            _ => None,
        }
    }

    /// The traversal, if this is a variable reference.
    pub fn as_traversal(&self) -> Option<&Traversal> {
        match &self.kind {
            ExprKind::Traversal(traversal) => Some(traversal),
            _ => None,
        }
    }

    /// The name of a bare identifier (`string`, `any`, an object key).
    pub fn as_bare_ident(&self) -> Option<&str> {
        self.as_traversal()
            .filter(|t| t.path.is_empty())
            .map(|t| t.root.as_str())
    }
}

impl Traversal {
    /// The attribute names following the root, stopping at the first non-attribute step.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.path.iter().map_while(|step| match step {
            TraversalStep::Attr(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for step in &self.path {
            match step {
                TraversalStep::Attr(name) => write!(f, ".{}", name)?,
                TraversalStep::Index(_) => write!(f, "[...]")?,
                TraversalStep::Splat => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

/// A concrete value produced by evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `null`
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A tuple or list.
    List(Vec<Value>),
    /// An object or map, ordered by key.
    Map(BTreeMap<String, Value>),
    /// A value that cannot be known statically (resource attributes, `path.module`...).
    #[default]
    Unknown,
}

impl Value {
    /// The string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The keys of a map value, in order.
    pub fn keys(&self) -> Option<Vec<String>> {
        match self {
            Value::Map(map) => Some(map.keys().cloned().collect()),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "tuple",
            Value::Map(_) => "object",
            Value::Unknown => "unknown",
        }
    }

    /// Render a primitive as template text.
    pub fn to_template_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}
