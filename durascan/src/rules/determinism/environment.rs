use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Rule, ScopeState};

/// Rule for environment variable reads inside the replay scope.
///
/// Environment values can change between the original execution and a later
/// replay (scale-out, app-setting updates), so orchestrators must receive
/// them as input or read them in an activity.
pub struct EnvironmentReadRule;

impl Rule for EnvironmentReadRule {
    fn name(&self) -> &'static str {
        "EnvironmentReadRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_ENV_READ
    }
    fn visit_expr(
        &mut self,
        expr: &Expr,
        context: &Context<'_>,
        scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        let _ = scope?;
        let (path, offset) = match expr {
            Expr::Call(call) => {
                let path = context.imports.resolve_expr(&call.func)?;
                if apis::classify_call(&path, context.config) != Some(ApiCategory::EnvRead) {
                    return None;
                }
                (path, call.range().start())
            }
            Expr::Subscript(subscript) => {
                let path = context.imports.resolve_expr(&subscript.value)?;
                apis::classify_subscript(&path)?;
                (path, subscript.range().start())
            }
            _ => return None,
        };
        let descriptor = get_rule_descriptor(self.code())?;
        Some(vec![create_finding(
            descriptor,
            format!(
                "`{path}` can differ between execution and replay; pass the value as orchestration input or read it in an activity"
            ),
            context,
            offset,
        )])
    }
}
