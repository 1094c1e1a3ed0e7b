//! Single-buffer analysis used by tests and editor-style integrations.

use std::path::Path;
use std::time::Instant;

use crate::analyzer::aggregation::{count_functions, function_records};
use crate::analyzer::types::{AnalysisResult, AnalysisSummary};
use crate::analyzer::DuraScan;
use crate::durable::FunctionIndex;

impl DuraScan {
    /// Analyzes one in-memory buffer as if it were a file on disk.
    ///
    /// The module name is derived from the file stem, so qualified names and
    /// same-module call edges behave as they do in a full run. Anything that
    /// needs other files (unknown-activity lookups, cross-file taint) sees
    /// only this buffer.
    #[must_use]
    pub fn analyze_code(&self, code: &str, file_path: &Path) -> AnalysisResult {
        let start = Instant::now();
        let module_name = file_path
            .file_stem()
            .map_or_else(|| String::from("module"), |stem| stem.to_string_lossy().into_owned());

        let fd = match self.discover_source(file_path, code.to_string(), &module_name) {
            Ok(fd) => fd,
            Err(error) => {
                return AnalysisResult {
                    findings: Vec::new(),
                    functions: Vec::new(),
                    parse_errors: vec![error],
                    analysis_summary: AnalysisSummary {
                        total_files: 1,
                        parse_errors_count: 1,
                        elapsed_seconds: start.elapsed().as_secs_f64(),
                        ..AnalysisSummary::default()
                    },
                };
            }
        };

        let index = FunctionIndex::build([&fd.discovery]);
        let output = self.lint_single_file(&fd, &index);
        let (findings, total_lines) = self.collect_findings(vec![output], &index);

        let functions = function_records(&index);
        let counts = count_functions(&index);

        let analysis_summary = AnalysisSummary {
            total_files: 1,
            total_lines_analyzed: total_lines,
            orchestrators_count: counts.orchestrators,
            activities_count: counts.activities,
            entities_count: counts.entities,
            client_bindings_count: counts.clients,
            findings_count: findings.len(),
            fixable_count: findings.iter().filter(|f| f.fix.is_some()).count(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            ..AnalysisSummary::default()
        };

        AnalysisResult {
            findings,
            functions,
            parse_errors: Vec::new(),
            analysis_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_code_reports_findings_and_functions() {
        let analyzer = DuraScan::default();
        let code = r#"
import uuid

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    return uuid.uuid4()
"#;
        let result = analyzer.analyze_code(code, Path::new("flows.py"));
        assert_eq!(result.analysis_summary.total_files, 1);
        assert_eq!(result.analysis_summary.orchestrators_count, 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].rule_id, "DS-N102");
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "flow");
        assert_eq!(result.analysis_summary.fixable_count, 1);
    }

    #[test]
    fn test_analyze_code_surfaces_parse_errors() {
        let analyzer = DuraScan::default();
        let result = analyzer.analyze_code("def broken(:\n", Path::new("bad.py"));
        assert!(result.findings.is_empty());
        assert_eq!(result.parse_errors.len(), 1);
        assert_eq!(result.analysis_summary.parse_errors_count, 1);
    }

    #[test]
    fn test_analyze_code_derives_module_from_stem() {
        let analyzer = DuraScan::default();
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    helper()

def helper():
    import os
    return os.getenv("REGION")
"#;
        let result = analyzer.analyze_code(code, Path::new("pkg/billing.py"));
        // helper joins the replay scope through the billing-module call edge.
        assert!(result
            .findings
            .iter()
            .any(|f| f.rule_id == "DS-N103" && f.line == 8));
    }
}
