use crate::analyzer::AnalysisResult;
use crate::rules::rule_registry::all_rule_descriptors;
use crate::utils::normalize_display_path;
use serde_json::json;
use std::io::Write;
use std::path::Path;

/// Synthetic rule ID used for parse errors, which have no registry entry.
const PARSE_ERROR_RULE_ID: &str = "DS-E001";

/// Generates a SARIF 2.1.0 report.
///
/// See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html
///
/// # Errors
///
/// Returns an error if serialization or writing to the output fails.
pub fn print_sarif_with_root(
    writer: &mut impl Write,
    result: &AnalysisResult,
    root: Option<&Path>,
) -> std::io::Result<()> {
    let rules: Vec<serde_json::Value> = all_rule_descriptors()
        .iter()
        .map(|descriptor| {
            json!({
                "id": descriptor.id,
                "name": descriptor.name,
                "shortDescription": { "text": descriptor.name },
                "helpUri": descriptor.docs_url,
                "defaultConfiguration": {
                    "level": sarif_level(descriptor.default_severity.as_str())
                },
                "properties": {
                    "category": descriptor.category.as_str()
                }
            })
        })
        .collect();

    let mut results: Vec<serde_json::Value> = result
        .findings
        .iter()
        .map(|finding| {
            json!({
                "ruleId": finding.rule_id,
                "level": sarif_level(&finding.severity),
                "message": { "text": finding.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": display_path(&finding.file, root) },
                        "region": {
                            "startLine": finding.line,
                            "startColumn": finding.col
                        }
                    }
                }]
            })
        })
        .collect();

    for error in &result.parse_errors {
        results.push(json!({
            "ruleId": PARSE_ERROR_RULE_ID,
            "level": "error",
            "message": { "text": format!("Parse error: {}", error.message) },
            "locations": [{
                "physicalLocation": {
                    "artifactLocation": { "uri": display_path(&error.file, root) },
                    "region": { "startLine": error.line.max(1) }
                }
            }]
        }));
    }

    let sarif = json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "durascan",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules
                }
            },
            "results": results
        }]
    });

    serde_json::to_writer_pretty(&mut *writer, &sarif)?;
    writeln!(writer)?;
    Ok(())
}

fn sarif_level(severity: &str) -> &'static str {
    match severity.to_uppercase().as_str() {
        "CRITICAL" | "HIGH" => "error",
        "MEDIUM" => "warning",
        _ => "note",
    }
}

fn display_path(file: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|root| file.strip_prefix(root).ok())
        .unwrap_or(file);
    normalize_display_path(relative)
}
