//! Variables must declare an explicit type.

use crate::error::Result;
use crate::hcl::{BlockSchema, BodySchema, ExprKind, Expression};
use crate::lint::runner::{IssueSink, Runner};
use crate::lint::{LintRule, RuleId, Severity};

/// Flags variables without a `type`, or whose type uses `any`.
pub struct AnyTypeVariablesRule;

/// Whether `any` appears anywhere in a type constructor tree.
fn uses_any(ty: &Expression) -> bool {
    match &ty.kind {
        ExprKind::Traversal(_) => ty.as_bare_ident() == Some("any"),
        ExprKind::FunctionCall(call) => call.args.iter().any(uses_any),
        ExprKind::Object(items) => items.iter().any(|item| uses_any(&item.value)),
        ExprKind::Tuple(elements) => elements.iter().any(uses_any),
        _ => false,
    }
}

impl LintRule for AnyTypeVariablesRule {
    fn id(&self) -> RuleId {
        RuleId::new("terraform_any_type_variables")
    }

    fn name(&self) -> &str {
        "Any-Type Variables"
    }

    fn description(&self) -> &str {
        "Requires variables to declare a type other than 'any'"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, runner: &dyn Runner, sink: &mut dyn IssueSink) -> Result<()> {
        let content = runner.module_content(
            &BodySchema::new().block(
                BlockSchema::new("variable")
                    .labels(&["name"])
                    .body(BodySchema::new().attributes(&["type"])),
            ),
        )?;

        for block in &content.blocks {
            match block.body.attribute("type") {
                None => sink.emit(self.diagnostic(
                    format!("variable '{}' should have a type", block.name()),
                    block.def_span.clone(),
                ))?,
                Some(ty) if uses_any(&ty.expr) => sink.emit(self.diagnostic(
                    format!(
                        "variable '{}' uses the 'any' type; declare an explicit type",
                        block.name()
                    ),
                    ty.span.clone(),
                ))?,
                Some(_) => {}
            }
        }

        Ok(())
    }
}
