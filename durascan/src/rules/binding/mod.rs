//! Trigger-binding checks (`DS-B2xx`).
//!
//! Unlike the walker-driven rules these run once per durable registration,
//! straight off the discovery record: the decorator's declared binding name
//! must land on a real parameter, and an annotated parameter must name the
//! SDK type the runtime will actually pass.

use crate::constants::{CONTEXT_CLASS, ENTITY_CONTEXT_CLASS, ORCHESTRATION_CLIENT_CLASS};
use crate::durable::{DurableFunction, FunctionKind, ParamInfo};
use crate::rules::rule_registry::{get_rule_descriptor, RuleDescriptor};
use crate::rules::{ids, Finding};

/// Checks one registration's binding declaration against its signature.
/// Returns at most one finding; the name check runs first.
#[must_use]
pub fn check_trigger_binding(function: &DurableFunction) -> Option<Finding> {
    // v1 factory registrations carry no decorator keyword to validate.
    if !function.via_decorator {
        return None;
    }
    let declared = function.declared_binding.as_deref()?;
    match function.kind {
        FunctionKind::Orchestrator => check_context_binding(
            function,
            declared,
            ids::RULE_ID_ORCHESTRATION_BINDING,
            CONTEXT_CLASS,
        ),
        FunctionKind::Entity => check_context_binding(
            function,
            declared,
            ids::RULE_ID_ENTITY_BINDING,
            ENTITY_CONTEXT_CLASS,
        ),
        FunctionKind::Activity => check_input_binding(function, declared),
        FunctionKind::Client => check_client_binding(function, declared),
    }
}

fn check_context_binding(
    function: &DurableFunction,
    declared: &str,
    rule_id: &str,
    expected_class: &str,
) -> Option<Finding> {
    let descriptor = get_rule_descriptor(rule_id)?;
    let Some(first) = function.first_param() else {
        return Some(binding_finding(
            descriptor,
            format!(
                "`{}` declares context_name=\"{declared}\" but takes no parameters",
                function.python_name
            ),
            function,
        ));
    };
    if first.name != declared {
        return Some(binding_finding(
            descriptor,
            format!(
                "context_name=\"{declared}\" does not match the first parameter \"{}\" of `{}`",
                first.name, function.python_name
            ),
            function,
        ));
    }
    annotation_mismatch(first, expected_class).map(|trailing| {
        binding_finding(
            descriptor,
            format!(
                "parameter \"{}\" of `{}` is annotated `{trailing}` but the runtime passes a `{expected_class}`",
                first.name, function.python_name
            ),
            function,
        )
    })
}

fn check_input_binding(function: &DurableFunction, declared: &str) -> Option<Finding> {
    let descriptor = get_rule_descriptor(ids::RULE_ID_ACTIVITY_BINDING)?;
    let Some(first) = function.first_param() else {
        return Some(binding_finding(
            descriptor,
            format!(
                "`{}` declares input_name=\"{declared}\" but takes no parameters",
                function.python_name
            ),
            function,
        ));
    };
    (first.name != declared).then(|| {
        binding_finding(
            descriptor,
            format!(
                "input_name=\"{declared}\" does not match the first parameter \"{}\" of `{}`",
                first.name, function.python_name
            ),
            function,
        )
    })
}

fn check_client_binding(function: &DurableFunction, declared: &str) -> Option<Finding> {
    let descriptor = get_rule_descriptor(ids::RULE_ID_CLIENT_BINDING)?;
    // Client functions usually take the HTTP request first, so the binding
    // may land on any parameter.
    let Some(param) = function.params.iter().find(|param| param.name == declared) else {
        return Some(binding_finding(
            descriptor,
            format!(
                "client_name=\"{declared}\" does not match any parameter of `{}`",
                function.python_name
            ),
            function,
        ));
    };
    annotation_mismatch(param, ORCHESTRATION_CLIENT_CLASS).map(|trailing| {
        binding_finding(
            descriptor,
            format!(
                "parameter \"{}\" of `{}` is annotated `{trailing}` but the runtime passes a `{ORCHESTRATION_CLIENT_CLASS}`",
                param.name, function.python_name
            ),
            function,
        )
    })
}

/// Returns the annotation's trailing segment when it disagrees with the
/// expected SDK class. Unannotated parameters are accepted.
fn annotation_mismatch<'a>(param: &'a ParamInfo, expected_class: &str) -> Option<&'a str> {
    let annotation = param.annotation.as_deref()?;
    let trailing = annotation.rsplit('.').next().unwrap_or(annotation);
    (trailing != expected_class).then_some(trailing)
}

fn binding_finding(
    descriptor: &RuleDescriptor,
    message: String,
    function: &DurableFunction,
) -> Finding {
    Finding {
        rule_id: descriptor.id.to_string(),
        severity: descriptor.default_severity.as_str().to_string(),
        category: descriptor.category.as_str().to_string(),
        message,
        file: function.file.as_ref().clone(),
        line: function.line,
        col: function.col,
        fix: None,
    }
}
