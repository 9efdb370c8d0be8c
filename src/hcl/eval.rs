//! A small static evaluator.
//!
//! Supports literals, templates, tuples, objects, `local.*` and `var.*`
//! references and a handful of collection/string functions. Everything else
//! evaluates to [`Value::Unknown`].

use std::collections::BTreeMap;

use super::expr::{ExprKind, Expression, TemplatePart, Traversal, TraversalStep, Value};
use super::module::Module;
use crate::error::{Result, TfstyleError};

/// Evaluates expressions against the locals and variable defaults of a module.
#[derive(Debug)]
pub struct Evaluator<'a> {
    locals: BTreeMap<&'a str, &'a Expression>,
    variables: BTreeMap<&'a str, Option<&'a Expression>>,
}

impl<'a> Evaluator<'a> {
    /// Collect every `locals` attribute and `variable` default in `module`.
    pub fn new(module: &'a Module) -> Self {
        let mut locals = BTreeMap::new();
        let mut variables = BTreeMap::new();

        for file in &module.files {
            for block in &file.body.blocks {
                match block.kind.as_str() {
                    "locals" => {
                        for (name, attr) in &block.body.attributes {
                            locals.entry(name.as_str()).or_insert(&attr.expr);
                        }
                    }
                    "variable" if !block.labels.is_empty() => {
                        let default = block.body.attribute("default").map(|a| &a.expr);
                        variables.entry(block.name()).or_insert(default);
                    }
                    _ => {}
                }
            }
        }

        Self { locals, variables }
    }

    /// Evaluate `expr` to a value.
    pub fn evaluate(&self, expr: &Expression) -> Result<Value> {
        self.eval(expr, &mut Vec::new())
    }

    fn eval(&self, expr: &Expression, stack: &mut Vec<&'a str>) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Template(parts) => self.template(parts, stack),
            ExprKind::Tuple(items) => items
                .iter()
                .map(|item| self.eval(item, stack))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            ExprKind::Object(items) => {
                let mut map = BTreeMap::new();
                for item in items {
                    let key = match item.key.as_bare_ident() {
                        Some(name) => name.to_string(),
                        None => match self.eval(&item.key, stack)? {
                            Value::Unknown => return Ok(Value::Unknown),
                            key => key.to_template_string().ok_or_else(|| {
                                TfstyleError::evaluation(format!(
                                    "object key must be a string, got {}",
                                    key.type_name()
                                ))
                            })?,
                        },
                    };
                    map.insert(key, self.eval(&item.value, stack)?);
                }
                Ok(Value::Map(map))
            }
            ExprKind::Traversal(traversal) => self.traversal(traversal, stack),
            ExprKind::FunctionCall(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.eval(arg, stack))
                    .collect::<Result<Vec<_>>>()?;
                call_function(&call.name, args)
            }
            ExprKind::Opaque => Ok(Value::Unknown),
        }
    }

    fn template(&self, parts: &[TemplatePart], stack: &mut Vec<&'a str>) -> Result<Value> {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Interpolation(expr) => match self.eval(expr, stack)? {
                    Value::Unknown => return Ok(Value::Unknown),
                    value => match value.to_template_string() {
                        Some(text) => out.push_str(&text),
                        None => {
                            return Err(TfstyleError::evaluation(format!(
                                "cannot interpolate a {} value",
                                value.type_name()
                            )))
                        }
                    },
                },
                TemplatePart::Directive => return Ok(Value::Unknown),
            }
        }
        Ok(Value::String(out))
    }

    fn traversal(&self, traversal: &Traversal, stack: &mut Vec<&'a str>) -> Result<Value> {
        let Some(TraversalStep::Attr(name)) = traversal.path.first() else {
            return Ok(Value::Unknown);
        };

        let root = match traversal.root.as_str() {
            "local" => {
                let Some((&key, &expr)) = self.locals.get_key_value(name.as_str()) else {
                    return Err(TfstyleError::evaluation(format!(
                        "unknown local value '{}'",
                        name
                    )));
                };
                if stack.contains(&key) {
                    return Err(TfstyleError::evaluation(format!(
                        "local value '{}' refers to itself",
                        name
                    )));
                }
                stack.push(key);
                let value = self.eval(expr, stack);
                stack.pop();
                value?
            }
            "var" => match self.variables.get(name.as_str()) {
                Some(Some(default)) => self.eval(default, stack)?,
                Some(None) => Value::Unknown,
                None => {
                    return Err(TfstyleError::evaluation(format!(
                        "undeclared input variable '{}'",
                        name
                    )))
                }
            },
            _ => return Ok(Value::Unknown),
        };

        traversal.path[1..]
            .iter()
            .try_fold(root, |value, step| self.step(value, step, stack))
    }

    fn step(&self, value: Value, step: &TraversalStep, stack: &mut Vec<&'a str>) -> Result<Value> {
        match (value, step) {
            (Value::Unknown, _) => Ok(Value::Unknown),
            (Value::Map(mut map), TraversalStep::Attr(name)) => Ok(map
                .remove(name)
                .unwrap_or(Value::Unknown)),
            (Value::Map(mut map), TraversalStep::Index(index)) => match self.eval(index, stack)? {
                Value::String(key) => Ok(map.remove(&key).unwrap_or(Value::Unknown)),
                _ => Ok(Value::Unknown),
            },
            (Value::List(mut items), TraversalStep::Index(index)) => {
                match self.eval(index, stack)? {
                    Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && (n as usize) < items.len() => {
                        Ok(items.swap_remove(n as usize))
                    }
                    _ => Ok(Value::Unknown),
                }
            }
            _ => Ok(Value::Unknown),
        }
    }
}

fn call_function(name: &str, args: Vec<Value>) -> Result<Value> {
    match name {
        "merge" => {
            let mut merged = BTreeMap::new();
            for arg in args {
                match arg {
                    Value::Unknown => return Ok(Value::Unknown),
                    Value::Null => {}
                    Value::Map(map) => merged.extend(map),
                    other => {
                        return Err(TfstyleError::evaluation(format!(
                            "merge arguments must be maps or objects, got {}",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::Map(merged))
        }
        "tomap" | "tolist" | "toset" => match <[Value; 1]>::try_from(args) {
            Ok([value]) => Ok(value),
            Err(args) => Err(TfstyleError::evaluation(format!(
                "{} takes exactly one argument, got {}",
                name,
                args.len()
            ))),
        },
        "lower" | "upper" => match args.as_slice() {
            [Value::String(s)] if name == "lower" => Ok(Value::String(s.to_lowercase())),
            [Value::String(s)] => Ok(Value::String(s.to_uppercase())),
            _ => Ok(Value::Unknown),
        },
        _ => Ok(Value::Unknown),
    }
}
