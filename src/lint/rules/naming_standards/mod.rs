//! Variable naming standards.
//!
//! Checks `variable` names, and every field name of structured types such as
//! `object({...})` and `map(object({...}))`, against a configurable format.
//!
//! ```yaml
//! rules:
//!   terraform_naming_standards:
//!     format: snake_case            # or mixed_snake_case, a custom format, or none
//!     custom: "^[a-z]+$"            # takes precedence over format
//!     custom_formats:
//!       upper: { regex: "^[A-Z_]+$", description: "UPPER_CASE" }
//!     variable:                     # replaces the settings above for variables
//!       format: mixed_snake_case
//! ```

pub mod format;

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TfstyleError};
use crate::hcl::{BlockSchema, BodySchema, ExprKind, Expression, Value};
use crate::lint::runner::{decode_rule_config, IssueSink, Runner};
use crate::lint::span::Span;
use crate::lint::{LintRule, RuleId, Severity};

pub use format::{resolve, CustomFormat, FormatError, NameValidator};

/// Checks variable and nested field names against a naming format.
pub struct NamingStandardsRule;

/// Options for [`NamingStandardsRule`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Named format, `none` to disable.
    pub format: String,
    /// Regular expression; takes precedence over `format`.
    pub custom: String,
    /// User-registered named formats.
    pub custom_formats: BTreeMap<String, CustomFormat>,
    /// Settings that replace the defaults for `variable` blocks.
    pub variable: Option<BlockFormat>,
}

/// Per-block-kind format override.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockFormat {
    pub format: String,
    pub custom: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            format: "snake_case".to_string(),
            custom: String::new(),
            custom_formats: BTreeMap::new(),
            variable: None,
        }
    }
}

impl NamingConfig {
    /// The validator for `variable` blocks, `None` when disabled.
    pub fn variable_validator(&self) -> std::result::Result<Option<NameValidator>, String> {
        let default = resolve(&self.custom, &self.format, &self.custom_formats)
            .map_err(|e| format!("invalid default configuration: {}", e))?;

        match &self.variable {
            Some(block) => resolve(&block.custom, &block.format, &self.custom_formats)
                .map_err(|e| format!("invalid variable configuration: {}", e)),
            None => Ok(default),
        }
    }
}

/// A field of a structured type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Dotted path from the variable name, e.g. `settings.network.cidr`.
    pub path: String,
}

/// Flatten the fields of an `object({...})` type expression, depth first.
///
/// Returns `None` unless `expr` is an `object` call with exactly one object
/// constructor argument. Keys that are neither string literals nor bare
/// identifiers are skipped.
pub fn object_fields(expr: &Expression, parent: &str) -> Option<Vec<Field>> {
    let call = expr.as_call("object")?;
    let [arg] = call.args.as_slice() else {
        return None;
    };
    let items = arg.as_object()?;

    let mut fields = Vec::new();
    for item in items {
        let name = match &item.key.kind {
            ExprKind::Literal(Value::String(s)) => s.as_str(),
            // Parenthesised traversals such as `(a.b)` are skipped, not validated by root.
            _ => match item.key.as_bare_ident() {
                Some(name) => name,
                None => continue,
            },
        };

        let path = format!("{}.{}", parent, name);
        let nested = object_fields(&item.value, &path);
        fields.push(Field { path });
        fields.extend(nested.into_iter().flatten());
    }
    Some(fields)
}

/// Fields declared by a variable `type`: `object({...})` or `map(object({...}))`.
fn type_fields(ty: &Expression, name: &str) -> Vec<Field> {
    let fields = match &ty.kind {
        ExprKind::FunctionCall(call) if call.name == "object" => object_fields(ty, name),
        ExprKind::FunctionCall(call) if call.name == "map" => match call.args.as_slice() {
            [inner] => object_fields(inner, name),
            _ => None,
        },
        _ => None,
    };
    fields.unwrap_or_default()
}

impl NamingStandardsRule {
    fn check_name(
        &self,
        validator: &NameValidator,
        block_kind: &str,
        name: &str,
        span: &Span,
        sink: &mut dyn IssueSink,
    ) -> Result<()> {
        if validator.is_valid(name) {
            return Ok(());
        }
        sink.emit(self.diagnostic(
            format!(
                "{} name '{}' must match the following {}: {}",
                block_kind,
                name,
                validator.kind(),
                validator.format()
            ),
            span.clone(),
        ))
    }
}

impl LintRule for NamingStandardsRule {
    fn id(&self) -> RuleId {
        RuleId::new("terraform_naming_standards")
    }

    fn name(&self) -> &str {
        "Naming Standards"
    }

    fn description(&self) -> &str {
        "Checks variable names and nested object field names against a naming format"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()> {
        let config: NamingConfig = decode_rule_config(runner, &self.id())?;
        let validator = config
            .variable_validator()
            .map_err(|message| TfstyleError::rule_config(self.id().as_str(), message))?;

        let Some(validator) = validator else {
            debug!("Naming validation disabled for variables");
            return Ok(());
        };

        let content = runner.module_content(
            &BodySchema::new().block(
                BlockSchema::new("variable")
                    .labels(&["name"])
                    .body(BodySchema::new().attributes(&["type"])),
            ),
        )?;

        for block in &content.blocks {
            let name = block.name();
            self.check_name(&validator, "variable", name, &block.def_span, sink)?;

            let Some(ty) = block.body.attribute("type") else {
                continue;
            };
            for field in type_fields(&ty.expr, name) {
                self.check_name(&validator, "variable", &field.path, &ty.span, sink)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::rules::testing::{assert_emit_failure_aborts, run};
    use crate::lint::LintDiagnostic;

    const MIXED: &str = "rules:\n  terraform_naming_standards:\n    format: mixed_snake_case\n";

    fn check(src: &str, config: &str) -> Vec<LintDiagnostic> {
        run(&NamingStandardsRule, src, config).unwrap()
    }

    fn messages(src: &str, config: &str) -> Vec<String> {
        check(src, config).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn default_snake_case_reports_dash() {
        let diagnostics = check(
            r#"
variable "dash-name" {
  description = "invalid"
}
"#,
            "",
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "variable name 'dash-name' must match the following format: snake_case"
        );
        assert_eq!(diagnostics[0].span, Some(Span::new("main.tf", 2, 1, 2, 21)));
    }

    #[test]
    fn default_snake_case_reports_camel_and_double_underscore() {
        let src = r#"
variable "camelCased" {
  description = "invalid"
}

variable "foo__bar" {
  description = "invalid"
}

variable "foo_bar" {
  description = "valid"
}
"#;
        let diagnostics = check(src, "");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].span, Some(Span::new("main.tf", 2, 1, 2, 22)));
        assert!(diagnostics[1].message.contains("'foo__bar'"));
    }

    #[test]
    fn custom_expression_uses_regexp_wording() {
        let config =
            "rules:\n  terraform_naming_standards:\n    custom: \"^[a-z][a-z]*(_[a-z]+)*$\"\n";

        assert_eq!(
            messages("variable \"dash-name\" {}\n", config),
            vec!["variable name 'dash-name' must match the following RegExp: ^[a-z][a-z]*(_[a-z]+)*$"]
        );
    }

    #[test]
    fn variable_override_replaces_default() {
        let config = r#"
rules:
  terraform_naming_standards:
    format: mixed_snake_case
    variable:
      format: snake_case
"#;
        assert_eq!(
            messages("variable \"PascalCase\" {}\n", config),
            vec!["variable name 'PascalCase' must match the following format: snake_case"]
        );
    }

    #[test]
    fn variable_override_applies_when_default_disabled() {
        let config = r#"
rules:
  terraform_naming_standards:
    format: none
    variable:
      custom: "^[a-z][a-z]*(_[a-z]+)*$"
"#;
        assert_eq!(
            messages("variable \"dash-name\" {}\n", config),
            vec!["variable name 'dash-name' must match the following RegExp: ^[a-z][a-z]*(_[a-z]+)*$"]
        );
    }

    #[test]
    fn none_disables_checks() {
        let config = "rules:\n  terraform_naming_standards:\n    format: none\n";
        assert!(messages("variable \"dash-name\" {}\n", config).is_empty());

        let config = "rules:\n  terraform_naming_standards:\n    variable:\n      format: none\n";
        assert!(messages("variable \"dash-name\" {}\n", config).is_empty());
    }

    #[test]
    fn custom_formats_use_description() {
        let config = r#"
rules:
  terraform_naming_standards:
    format: upper
    custom_formats:
      upper:
        regex: "^[A-Z_]+$"
        description: UPPER_CASE
"#;
        assert_eq!(
            messages("variable \"lower\" {}\nvariable \"UPPER\" {}\n", config),
            vec!["variable name 'lower' must match the following format: UPPER_CASE"]
        );
    }

    #[test]
    fn configuration_errors_are_prefixed() {
        let config = "rules:\n  terraform_naming_standards:\n    format: kebab\n";
        let err = run(&NamingStandardsRule, "variable \"a\" {}\n", config).unwrap_err();
        assert!(err
            .to_string()
            .contains("invalid default configuration: `kebab` is unsupported format"));

        let config = "rules:\n  terraform_naming_standards:\n    variable:\n      custom: \"(\"\n";
        let err = run(&NamingStandardsRule, "variable \"a\" {}\n", config).unwrap_err();
        assert!(err
            .to_string()
            .contains("invalid variable configuration: invalid regular expression"));
    }

    #[test]
    fn object_fields_are_checked_at_type_range() {
        let src = r#"
variable "foo_bar" {
  description = "valid"
  type = object({
    foo-bar-one = string
    foo-bar-two = number
  })
}
"#;
        let diagnostics = check(src, MIXED);

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "variable name 'foo_bar.foo-bar-one' must match the following format: mixed_snake_case",
                "variable name 'foo_bar.foo-bar-two' must match the following format: mixed_snake_case",
            ]
        );
        for d in &diagnostics {
            assert_eq!(d.span, Some(Span::new("main.tf", 4, 3, 7, 5)));
        }
    }

    #[test]
    fn map_of_nested_objects_is_walked() {
        let src = r#"
variable "foo_bar" {
  description = "valid"
  type = map(object({
    mixed-snake-case-dash = string
    test_object           = object({
      mixed-snake-case-dash = string
      PascalCase            = number
      camelCase             = bool
    })
  }))
}
"#;
        let diagnostics = check(src, MIXED);

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "variable name 'foo_bar.mixed-snake-case-dash' must match the following format: mixed_snake_case",
                "variable name 'foo_bar.test_object.mixed-snake-case-dash' must match the following format: mixed_snake_case",
            ]
        );
        assert_eq!(diagnostics[1].span, Some(Span::new("main.tf", 4, 3, 11, 6)));
    }

    #[test]
    fn valid_nested_objects_pass() {
        let src = r#"
variable "foo_bar" {
  type = object({
    foo_bar_one    = string
    foo_bar_subObj = object({
      mixed_snake_case = string
      PascalCase       = object({
        foo_bar_test = string
      })
    })
  })
}
"#;
        assert!(messages(src, MIXED).is_empty());
    }

    #[test]
    fn other_type_shapes_are_skipped() {
        let src = r#"
variable "a" {
  type = list(object({ Bad-Name = string }))
}

variable "b" {
  type = map(string)
}

variable "c" {
  type = string
}
"#;
        assert!(messages(src, "").is_empty());
    }

    #[test]
    fn object_fields_recurses_in_order() {
        let module = crate::hcl::Module::from_sources([(
            "main.tf",
            "t = object({ a = string, \"b\" = object({ c = number }), d = bool })\n",
        )])
        .unwrap();
        let expr = &module.files[0].body.attribute("t").unwrap().expr;

        let paths: Vec<_> = object_fields(expr, "v")
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["v.a", "v.b", "v.b.c", "v.d"]);
    }

    #[test]
    fn object_fields_rejects_non_object_calls() {
        let module =
            crate::hcl::Module::from_sources([("main.tf", "t = object()\nu = map(string)\n")])
                .unwrap();
        let body = &module.files[0].body;

        assert!(object_fields(&body.attribute("t").unwrap().expr, "v").is_none());
        assert!(object_fields(&body.attribute("u").unwrap().expr, "v").is_none());
    }

    #[test]
    fn traversal_keys_are_skipped() {
        let module = crate::hcl::Module::from_sources([(
            "main.tf",
            "t = object({ (BadName.x) = string, y = number })\n",
        )])
        .unwrap();
        let expr = &module.files[0].body.attribute("t").unwrap().expr;

        let paths: Vec<_> = object_fields(expr, "v")
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["v.y"]);

        let src = "variable \"a\" {\n  type = object({ (BadName.x) = string })\n}\n";
        assert!(messages(src, "").is_empty());
    }

    #[test]
    fn emit_failure_aborts_check() {
        let src = r#"
variable "Bad-One" {
  type = string
}

variable "Bad-Two" {
  type = string
}
"#;
        assert_emit_failure_aborts(&NamingStandardsRule, src, "");

        let nested = "variable \"ok\" {\n  type = object({ Bad-A = string, Bad-B = number })\n}\n";
        assert_emit_failure_aborts(&NamingStandardsRule, nested, "");
    }
}
