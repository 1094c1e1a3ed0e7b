//! Cross-file activity invocation checks (`DS-A3xx`).
#![allow(clippy::unwrap_used)]

use durascan::analyzer::DuraScan;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn scan_project(files: &[(&str, &str)]) -> durascan::AnalysisResult {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        write_file(dir.path(), name, content);
    }
    let mut analyzer = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
    analyzer.analyze(dir.path())
}

const ACTIVITIES: &str = r#"
@app.activity_trigger(input_name="order")
def process_order(order: str):
    return order

@app.activity_trigger(input_name="count")
def bump(count: int):
    return count + 1

@app.activity_trigger(input_name="payload")
def relay(payload):
    return payload
"#;

#[test]
fn test_unknown_activity_name_is_reported() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("process_order", "o-1")
    yield ctx.call_activity("prcoess_order", "o-2")
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);

    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-A301");
    assert_eq!(finding.severity, "CRITICAL");
    assert!(finding.message.contains("prcoess_order"));
    assert_eq!(finding.line, 5);
}

#[test]
fn test_unknown_activity_stays_quiet_without_registrations() {
    // A lone orchestrator file gives no evidence the project was fully
    // scanned, so nothing is assumed missing.
    let result = scan_project(&[(
        "orchestrators.py",
        r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("somewhere_else", 1)
"#,
    )]);
    assert!(result.findings.is_empty());
}

#[test]
fn test_call_activity_with_retry_is_checked_too() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity_with_retry("missing", retry_options, "o-1")
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "DS-A301");
}

#[test]
fn test_computed_activity_names_are_skipped() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx, name="x"):
    yield ctx.call_activity(name, 1)
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert!(result
        .findings
        .iter()
        .all(|f| f.rule_id != "DS-A301"));
}

#[test]
fn test_literal_input_type_mismatch() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("process_order", 42)
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);

    assert_eq!(result.findings.len(), 1);
    let finding = &result.findings[0];
    assert_eq!(finding.rule_id, "DS-A302");
    assert!(finding.message.contains("process_order"));
    assert!(finding.message.contains("`str`"));
    assert!(finding.message.contains("`int`"));
}

#[test]
fn test_compatible_literals_are_accepted() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("process_order", "o-1")
    yield ctx.call_activity("bump", 3)
    yield ctx.call_activity("bump", True)
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert!(result.findings.is_empty());
}

#[test]
fn test_retry_form_reads_the_third_argument_as_input() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity_with_retry("bump", retry_options, "not-a-number")
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "DS-A302");
}

#[test]
fn test_input_keyword_argument_is_recognized() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("bump", input_="three")
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "DS-A302");
}

#[test]
fn test_unannotated_activities_and_non_literal_inputs_are_skipped() {
    let result = scan_project(&[
        (
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx, payload=None):
    yield ctx.call_activity("relay", 42)
    yield ctx.call_activity("process_order", payload)
"#,
        ),
        ("activities.py", ACTIVITIES),
    ]);
    assert!(result.findings.is_empty());
}
