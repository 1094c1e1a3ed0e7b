use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::fix::Edit;
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Fix, Rule, ScopeState};

/// Rule for wall-clock reads inside the replay scope.
pub struct CurrentTimeRule;

impl Rule for CurrentTimeRule {
    fn name(&self) -> &'static str {
        "CurrentTimeRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_CURRENT_TIME
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
        if apis::classify_call(&path, context.config) != Some(ApiCategory::CurrentTime) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let base = scope.context_var.unwrap_or("context");
        let mut finding = create_finding(
            descriptor,
            format!(
                "`{path}()` reads the wall clock and returns a different value on every replay; use `{base}.current_utc_datetime`"
            ),
            context,
            call.range().start(),
        );
        if let Some(ctx_var) = scope.context_var {
            // Only rewrite the plain no-argument form; `now(tz)` needs a human.
            if call.arguments.args.is_empty() && call.arguments.keywords.is_empty() {
                finding.fix = Some(Fix {
                    title: format!("Replace with `{ctx_var}.current_utc_datetime`"),
                    edits: vec![Edit::replace(
                        call.range(),
                        format!("{ctx_var}.current_utc_datetime"),
                    )],
                });
            }
        }
        Some(vec![finding])
    }
}
