use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::fix::Edit;
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Fix, Rule, ScopeState};

/// Rule for fresh GUIDs and random values inside the replay scope.
pub struct UuidRandomRule;

impl Rule for UuidRandomRule {
    fn name(&self) -> &'static str {
        "UuidRandomRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_UUID_RANDOM
    }
    fn visit_expr(
        &mut self,
        expr: &Expr,
        context: &Context<'_>,
        scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        let scope = scope?;
        let Expr::Call(call) = expr else {
            return None;
        };
        let path = context.imports.resolve_expr(&call.func)?;
        if apis::classify_call(&path, context.config) != Some(ApiCategory::Random) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let base = scope.context_var.unwrap_or("context");
        let message = if path.starts_with("uuid.") {
            format!(
                "`{path}()` mints a fresh GUID on every replay; use `{base}.new_uuid()` for a deterministic one"
            )
        } else {
            format!(
                "`{path}` produces a different value on every replay; compute it in an activity"
            )
        };
        let mut finding = create_finding(descriptor, message, context, call.range().start());
        if let Some(ctx_var) = scope.context_var {
            if (path == "uuid.uuid4" || path == "uuid.uuid1")
                && call.arguments.args.is_empty()
                && call.arguments.keywords.is_empty()
            {
                finding.fix = Some(Fix {
                    title: format!("Replace with `{ctx_var}.new_uuid()`"),
                    edits: vec![Edit::replace(call.range(), format!("{ctx_var}.new_uuid()"))],
                });
            }
        }
        Some(vec![finding])
    }
}
