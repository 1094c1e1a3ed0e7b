//! Aggregation of per-file lint output into one analysis result.

use rustc_hash::FxHashSet;

use super::single_file::{LintOutput, RootCall};
use super::types::{AnalysisResult, AnalysisSummary, FunctionRecord, ParseError};
use super::DuraScan;
use crate::durable::{FunctionIndex, FunctionKind, ScopeOrigin};
use crate::rules::ids::RULE_ID_TRANSITIVE_CALL;
use crate::rules::rule_registry::{get_rule_descriptor, RuleSeverity};
use crate::rules::Finding;

#[derive(Default)]
pub(crate) struct FunctionCounts {
    pub(crate) orchestrators: usize,
    pub(crate) activities: usize,
    pub(crate) entities: usize,
    pub(crate) clients: usize,
}

pub(crate) fn count_functions(index: &FunctionIndex) -> FunctionCounts {
    let mut counts = FunctionCounts::default();
    for function in index.functions() {
        match function.kind {
            FunctionKind::Orchestrator => counts.orchestrators += 1,
            FunctionKind::Activity => counts.activities += 1,
            FunctionKind::Entity => counts.entities += 1,
            FunctionKind::Client => counts.clients += 1,
        }
    }
    counts
}

pub(crate) fn function_records(index: &FunctionIndex) -> Vec<FunctionRecord> {
    let mut functions: Vec<FunctionRecord> = index
        .functions()
        .iter()
        .map(FunctionRecord::from_function)
        .collect();
    functions.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.line.cmp(&b.line)));
    functions
}

pub(crate) fn sort_findings(findings: &mut [Finding]) {
    findings.sort_unstable_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.col.cmp(&b.col))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}

impl DuraScan {
    /// Merges per-file output, materializes transitive-call findings against
    /// the completed index, and applies the global filters.
    pub(crate) fn aggregate_results(
        &mut self,
        outputs: Vec<LintOutput>,
        index: &FunctionIndex,
        mut parse_errors: Vec<ParseError>,
        total_directories: usize,
        elapsed_seconds: f64,
    ) -> AnalysisResult {
        let (findings, total_lines) = self.collect_findings(outputs, index);
        self.total_lines_analyzed = total_lines;

        parse_errors.sort_by(|a, b| a.file.cmp(&b.file));

        let functions = function_records(index);
        let counts = count_functions(index);

        let analysis_summary = AnalysisSummary {
            total_files: self.total_files_analyzed,
            total_directories,
            total_lines_analyzed: self.total_lines_analyzed,
            orchestrators_count: counts.orchestrators,
            activities_count: counts.activities,
            entities_count: counts.entities,
            client_bindings_count: counts.clients,
            findings_count: findings.len(),
            fixable_count: findings.iter().filter(|f| f.fix.is_some()).count(),
            parse_errors_count: parse_errors.len(),
            elapsed_seconds,
        };

        AnalysisResult {
            findings,
            functions,
            parse_errors,
            analysis_summary,
        }
    }

    /// Flattens lint output into a filtered, sorted finding list. Returns the
    /// findings together with the total number of source lines seen.
    pub(crate) fn collect_findings(
        &self,
        outputs: Vec<LintOutput>,
        index: &FunctionIndex,
    ) -> (Vec<Finding>, usize) {
        let ignored = self.effective_ignores();
        let min_severity = self.effective_min_severity();

        let mut findings = Vec::new();
        let mut total_lines = 0;
        for output in outputs {
            total_lines += output.line_count;
            findings.extend(output.findings);
            for root_call in output.root_calls {
                if let Some(finding) = self.transitive_finding(&root_call, index) {
                    findings.push(finding);
                }
            }
        }

        findings.retain(|finding| {
            if ignored.contains(finding.rule_id.as_str()) {
                return false;
            }
            if let Some(min) = min_severity {
                if RuleSeverity::parse(&finding.severity).is_some_and(|severity| severity < min) {
                    return false;
                }
            }
            true
        });

        sort_findings(&mut findings);
        (findings, total_lines)
    }

    fn effective_ignores(&self) -> FxHashSet<String> {
        self.config
            .durascan
            .ignore
            .iter()
            .flatten()
            .chain(&self.ignored_rules)
            .map(|id| id.trim().to_uppercase())
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// The stricter of the CLI and configuration severity floors wins.
    fn effective_min_severity(&self) -> Option<RuleSeverity> {
        let configured = self
            .config
            .durascan
            .min_severity
            .as_deref()
            .and_then(RuleSeverity::parse);
        match (self.min_severity, configured) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    fn transitive_finding(&self, root_call: &RootCall, index: &FunctionIndex) -> Option<Finding> {
        if root_call.suppressed {
            return None;
        }
        if !index.transitively_nondeterministic(&root_call.callee_qualified) {
            return None;
        }
        // A function explicitly marked deterministic is taken at its word at
        // the call site; violations inside its body still get their own
        // findings on their own lines.
        if index
            .replay_scope(&root_call.callee_qualified)
            .is_some_and(|membership| membership.origin == ScopeOrigin::Marked)
        {
            return None;
        }
        if self.is_rule_ignored_for_path(root_call.file.as_ref(), RULE_ID_TRANSITIVE_CALL) {
            return None;
        }
        let descriptor = get_rule_descriptor(RULE_ID_TRANSITIVE_CALL)?;
        Some(Finding {
            rule_id: descriptor.id.to_string(),
            severity: descriptor.default_severity.as_str().to_string(),
            category: descriptor.category.as_str().to_string(),
            message: format!(
                "'{}()' reaches a non-deterministic API through its call chain",
                root_call.callee_display
            ),
            file: root_call.file.as_ref().clone(),
            line: root_call.line,
            col: root_call.col,
            fix: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn finding(rule_id: &str, severity: &str, file: &str, line: usize, col: usize) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            severity: severity.to_string(),
            category: "Determinism".to_string(),
            message: String::new(),
            file: PathBuf::from(file),
            line,
            col,
            fix: None,
        }
    }

    fn output(findings: Vec<Finding>) -> LintOutput {
        LintOutput {
            findings,
            root_calls: Vec::new(),
            line_count: 10,
        }
    }

    #[test]
    fn test_global_ignores_drop_findings_case_insensitively() {
        let analyzer =
            DuraScan::new(false, None, None).with_ignored_rules(vec!["ds-n101".to_string()]);
        let index = FunctionIndex::default();
        let outputs = vec![output(vec![
            finding("DS-N101", "HIGH", "a.py", 1, 1),
            finding("DS-N104", "HIGH", "a.py", 2, 1),
        ])];

        let (findings, total_lines) = analyzer.collect_findings(outputs, &index);
        assert_eq!(total_lines, 10);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "DS-N104");
    }

    #[test]
    fn test_min_severity_floor_filters_lower_findings() {
        let analyzer =
            DuraScan::new(false, None, None).with_min_severity(Some(RuleSeverity::High));
        let index = FunctionIndex::default();
        let outputs = vec![output(vec![
            finding("DS-N103", "MEDIUM", "a.py", 1, 1),
            finding("DS-B201", "CRITICAL", "a.py", 2, 1),
            finding("DS-N101", "HIGH", "a.py", 3, 1),
        ])];

        let (findings, _) = analyzer.collect_findings(outputs, &index);
        let ids: Vec<&str> = findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["DS-B201", "DS-N101"]);
    }

    #[test]
    fn test_findings_sort_by_file_line_col_rule() {
        let analyzer = DuraScan::new(false, None, None);
        let index = FunctionIndex::default();
        let outputs = vec![
            output(vec![finding("DS-N102", "HIGH", "b.py", 1, 1)]),
            output(vec![
                finding("DS-N105", "HIGH", "a.py", 9, 5),
                finding("DS-N101", "HIGH", "a.py", 2, 8),
                finding("DS-N104", "HIGH", "a.py", 2, 1),
            ]),
        ];

        let (findings, _) = analyzer.collect_findings(outputs, &index);
        let order: Vec<(String, usize, usize)> = findings
            .iter()
            .map(|f| (f.file.display().to_string(), f.line, f.col))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.py".to_string(), 2, 1),
                ("a.py".to_string(), 2, 8),
                ("a.py".to_string(), 9, 5),
                ("b.py".to_string(), 1, 1),
            ]
        );
    }

    #[test]
    fn test_config_and_cli_severity_floors_take_the_stricter() {
        let mut analyzer =
            DuraScan::new(false, None, None).with_min_severity(Some(RuleSeverity::Medium));
        analyzer.config.durascan.min_severity = Some("high".to_string());
        assert_eq!(analyzer.effective_min_severity(), Some(RuleSeverity::High));

        let cli_only = DuraScan::new(false, None, None).with_min_severity(Some(RuleSeverity::Low));
        assert_eq!(cli_only.effective_min_severity(), Some(RuleSeverity::Low));

        let neither = DuraScan::new(false, None, None);
        assert_eq!(neither.effective_min_severity(), None);
    }
}
