use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Rule, ScopeState};

/// Rule for thread, process and task spawns inside the replay scope.
pub struct SpawnRule;

impl Rule for SpawnRule {
    fn name(&self) -> &'static str {
        "SpawnRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_SPAWN
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
        if apis::classify_call(&path, context.config) != Some(ApiCategory::Spawn) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let base = scope.context_var.unwrap_or("context");
        Some(vec![create_finding(
            descriptor,
            format!(
                "`{path}` spawns work the replay cannot reproduce; fan out with `{base}.task_all` over activities"
            ),
            context,
            call.range().start(),
        )])
    }
}
