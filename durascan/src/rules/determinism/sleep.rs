use ruff_python_ast::Expr;
use ruff_text_size::Ranged;

use super::apis::{self, ApiCategory};
use crate::durable::TimedeltaBinding;
use crate::fix::Edit;
use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Fix, Rule, ScopeState};

/// Rule for blocking sleeps inside the replay scope.
pub struct BlockingSleepRule;

impl Rule for BlockingSleepRule {
    fn name(&self) -> &'static str {
        "BlockingSleepRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_BLOCKING_SLEEP
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
        if apis::classify_call(&path, context.config) != Some(ApiCategory::Sleep) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let base = scope.context_var.unwrap_or("context");
        let mut finding = create_finding(
            descriptor,
            format!(
                "`{path}` blocks the worker during replay; use `yield {base}.create_timer(...)` for durable delays"
            ),
            context,
            call.range().start(),
        );
        if path == "time.sleep" && scope.at_stmt_level {
            if let Some(ctx_var) = scope.context_var {
                if let [duration] = call.arguments.args.as_ref() {
                    if call.arguments.keywords.is_empty() {
                        let seconds = &context.source[duration.range()];
                        let (timedelta, import_edit) = match context.imports.timedelta_binding() {
                            TimedeltaBinding::Name(name) => (name, None),
                            TimedeltaBinding::NeedsImport(edit) => {
                                (String::from("timedelta"), Some(edit))
                            }
                        };
                        let mut edits = vec![Edit::replace(
                            call.range(),
                            format!(
                                "yield {ctx_var}.create_timer({ctx_var}.current_utc_datetime + {timedelta}(seconds={seconds}))"
                            ),
                        )];
                        edits.extend(import_edit);
                        finding.fix = Some(Fix {
                            title: format!("Replace with a `{ctx_var}.create_timer(...)` yield"),
                            edits,
                        });
                    }
                }
            }
        }
        Some(vec![finding])
    }
}
