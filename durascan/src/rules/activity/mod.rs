//! Activity invocation rules (`DS-A3xx`).
//!
//! These fire on `<receiver>.call_activity("Name", input)` and
//! `<receiver>.call_activity_with_retry("Name", retry, input)` call sites,
//! matching the string-literal activity name against the project-wide index.

use ruff_python_ast::{self as ast, Expr};
use ruff_text_size::{Ranged, TextSize};

use crate::rules::rule_registry::get_rule_descriptor;
use crate::rules::{create_finding, ids, Context, Finding, Rule, ScopeState};

/// A recognized activity scheduling call.
struct ActivityCall<'a> {
    /// The string literal naming the activity.
    name: &'a ast::ExprStringLiteral,
    /// The input argument, when present.
    input: Option<&'a Expr>,
}

/// Matches an activity scheduling call with a literal name. Calls whose name
/// is computed are invisible to cross-file checks and are skipped.
fn activity_call(expr: &Expr) -> Option<ActivityCall<'_>> {
    let Expr::Call(call) = expr else {
        return None;
    };
    let Expr::Attribute(attr) = &*call.func else {
        return None;
    };
    let input_position = match attr.attr.as_str() {
        "call_activity" => 1,
        "call_activity_with_retry" => 2,
        _ => return None,
    };
    let Some(Expr::StringLiteral(name)) = call.arguments.args.first() else {
        return None;
    };
    let input = call
        .arguments
        .keywords
        .iter()
        .find(|keyword| keyword.arg.as_ref().is_some_and(|arg| arg == "input_"))
        .map(|keyword| &keyword.value)
        .or_else(|| call.arguments.args.get(input_position));
    Some(ActivityCall { name, input })
}

/// Literal kind of a call argument, for the input type check. Only clear-cut
/// literals participate.
fn literal_kind(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::StringLiteral(_) => Some("str"),
        Expr::BooleanLiteral(_) => Some("bool"),
        Expr::NumberLiteral(number) => match &number.value {
            ast::Number::Int(_) => Some("int"),
            ast::Number::Float(_) => Some("float"),
            ast::Number::Complex { .. } => None,
        },
        Expr::Dict(_) => Some("dict"),
        Expr::List(_) => Some("list"),
        _ => None,
    }
}

fn annotation_kind(annotation: &str) -> Option<&'static str> {
    match annotation {
        "str" => Some("str"),
        "int" => Some("int"),
        "float" => Some("float"),
        "bool" => Some("bool"),
        "dict" => Some("dict"),
        "list" => Some("list"),
        _ => None,
    }
}

/// A literal is acceptable when kinds agree; `int` literals additionally
/// satisfy `float` annotations and `bool` literals satisfy `int`.
fn compatible(literal: &'static str, annotation: &'static str) -> bool {
    literal == annotation
        || (literal == "int" && annotation == "float")
        || (literal == "bool" && annotation == "int")
}

/// Rule for activity names no file registers.
pub struct UnknownActivityRule;

impl Rule for UnknownActivityRule {
    fn name(&self) -> &'static str {
        "UnknownActivityRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_UNKNOWN_ACTIVITY
    }
    fn visit_expr(
        &mut self,
        expr: &Expr,
        context: &Context<'_>,
        _scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        let call = activity_call(expr)?;
        // Partial codebases register no activities at all; stay quiet there.
        if !context.index.has_activities() {
            return None;
        }
        let name = call.name.value.to_str();
        if context.index.activity(name).is_some() {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        Some(vec![create_finding(
            descriptor,
            format!("no activity named \"{name}\" is registered in the analyzed files"),
            context,
            call.name.range().start(),
        )])
    }
}

/// Rule for literal inputs that conflict with the activity's annotation.
pub struct ActivityInputTypeRule;

impl Rule for ActivityInputTypeRule {
    fn name(&self) -> &'static str {
        "ActivityInputTypeRule"
    }
    fn code(&self) -> &'static str {
        ids::RULE_ID_ACTIVITY_INPUT_TYPE
    }
    fn visit_expr(
        &mut self,
        expr: &Expr,
        context: &Context<'_>,
        _scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        let call = activity_call(expr)?;
        let activity = context.index.activity(call.name.value.to_str())?;
        let annotation = activity.first_param()?.annotation.as_deref()?;
        let expected = annotation_kind(annotation)?;
        let input = call.input?;
        let actual = literal_kind(input)?;
        if compatible(actual, expected) {
            return None;
        }
        let descriptor = get_rule_descriptor(self.code())?;
        let offset: TextSize = input.range().start();
        Some(vec![create_finding(
            descriptor,
            format!(
                "activity \"{}\" expects `{expected}` input but this call passes a `{actual}` literal",
                activity.registered_name
            ),
            context,
            offset,
        )])
    }
}

/// Returns fresh instances of every activity-call rule.
#[must_use]
pub fn get_activity_rules() -> Vec<Box<dyn super::Rule>> {
    vec![Box::new(UnknownActivityRule), Box::new(ActivityInputTypeRule)]
}
