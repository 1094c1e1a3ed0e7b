use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Rule, ScopeState};

/// Rule for outbound I/O inside the replay scope.
pub struct IoClientRule;

impl Rule for IoClientRule {
    fn name(&self) -> &'static str {
        "IoClientRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_IO_CLIENT
    }
    fn visit_expr(
        &mut self,
        expr: &Expr,
        context: &Context<'_>,
        scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        let _ = scope?;
        let Expr::Call(call) = expr else {
            return None;
        };
        let path = context.imports.resolve_expr(&call.func)?;
        if apis::classify_call(&path, context.config) != Some(ApiCategory::IoClient) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let message = if path == "open" {
            String::from(
                "`open()` performs file I/O that re-runs on every replay; move it into an activity function",
            )
        } else {
            format!(
                "`{path}` performs I/O that re-runs on every replay; move it into an activity function"
            )
        };
        Some(vec![create_finding(
            descriptor,
            message,
            context,
            call.range().start(),
        )])
    }
}
