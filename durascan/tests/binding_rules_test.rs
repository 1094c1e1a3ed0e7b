//! String-fixture coverage for the trigger-binding rules (`DS-B2xx`).
#![allow(clippy::unwrap_used)]

use durascan::analyzer::DuraScan;
use std::path::Path;

fn scan(code: &str) -> durascan::AnalysisResult {
    DuraScan::default().analyze_code(code, Path::new("function_app.py"))
}

#[test]
fn test_matching_bindings_are_clean() {
    let result = scan(
        r#"
import azure.durable_functions as df
import azure.functions as func

@app.orchestration_trigger(context_name="context")
def flow(context: df.DurableOrchestrationContext):
    pass

@app.activity_trigger(input_name="payload")
def work(payload: str):
    return payload

@app.entity_trigger(context_name="context")
def counter(context: df.DurableEntityContext):
    pass

@app.durable_client_input(client_name="client")
def start(req: func.HttpRequest, client: df.DurableOrchestrationClient):
    return client
"#,
    );
    assert!(result.findings.is_empty());
    assert_eq!(result.functions.len(), 4);
}

#[test]
fn test_orchestration_context_name_mismatch() {
    let result = scan(
        r#"
@app.orchestration_trigger(context_name="context")
def flow(ctx):
    pass
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B201");
    assert_eq!(finding.severity, "CRITICAL");
    assert_eq!(finding.line, 3);
    assert!(finding.message.contains("context_name=\"context\""));
    assert!(finding.message.contains("\"ctx\""));
}

#[test]
fn test_orchestration_context_annotation_mismatch() {
    let result = scan(
        r#"
import azure.functions as func

@app.orchestration_trigger(context_name="context")
def flow(context: func.HttpRequest):
    pass
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B201");
    assert!(finding.message.contains("HttpRequest"));
    assert!(finding.message.contains("DurableOrchestrationContext"));
}

#[test]
fn test_unannotated_context_parameter_is_accepted() {
    let result = scan(
        r#"
@app.orchestration_trigger(context_name="context")
def flow(context):
    pass
"#,
    );
    assert!(result.findings.is_empty());
}

#[test]
fn test_activity_input_name_mismatch() {
    let result = scan(
        r#"
@app.activity_trigger(input_name="payload")
def work(value):
    return value
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B202");
    assert!(finding.message.contains("input_name=\"payload\""));
}

#[test]
fn test_activity_without_parameters() {
    let result = scan(
        r#"
@app.activity_trigger(input_name="payload")
def work():
    return None
"#,
    );
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "DS-B202");
    assert!(result.findings[0].message.contains("takes no parameters"));
}

#[test]
fn test_client_binding_matches_any_parameter_position() {
    let result = scan(
        r#"
@app.durable_client_input(client_name="starter")
def start(req, starter):
    return starter
"#,
    );
    assert!(result.findings.is_empty());
}

#[test]
fn test_client_binding_without_matching_parameter() {
    let result = scan(
        r#"
@app.durable_client_input(client_name="starter")
def start(req, client):
    return client
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B203");
    assert!(finding.message.contains("client_name=\"starter\""));
}

#[test]
fn test_client_annotation_must_be_the_client_class() {
    let result = scan(
        r#"
import azure.durable_functions as df

@app.durable_client_input(client_name="client")
def start(req, client: df.DurableEntityContext):
    return client
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B203");
    assert!(finding.message.contains("DurableOrchestrationClient"));
}

#[test]
fn test_entity_context_checks_the_entity_class() {
    let result = scan(
        r#"
import azure.durable_functions as df

@app.entity_trigger(context_name="context")
def counter(context: df.DurableOrchestrationContext):
    pass
"#,
    );
    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-B204");
    assert!(finding.message.contains("DurableEntityContext"));
}

#[test]
fn test_trigger_without_keyword_argument_is_skipped() {
    let result = scan(
        r#"
@app.orchestration_trigger
def flow(ctx):
    pass
"#,
    );
    assert!(result
        .findings
        .iter()
        .all(|f| f.rule_id != "DS-B201"));
}

#[test]
fn test_v1_factory_registration_has_no_binding_to_check() {
    let result = scan(
        r#"
import azure.durable_functions as df

def flow(whatever):
    pass

main = df.Orchestrator.create(flow)
"#,
    );
    assert!(result.findings.is_empty());
}
