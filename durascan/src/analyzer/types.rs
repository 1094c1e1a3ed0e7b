//! Result types for the analyzer.

use serde::Serialize;
use std::path::PathBuf;

use crate::durable::DurableFunction;
use crate::rules::Finding;

/// A file that could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct ParseError {
    /// File the error occurred in.
    pub file: PathBuf,
    /// 1-indexed line of the error, `0` when the file could not be read.
    pub line: usize,
    /// Parser or I/O error message.
    pub message: String,
}

/// A durable function registration, as reported to users.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRecord {
    /// Name the runtime knows the function by.
    pub name: String,
    /// Role of the function (`Orchestrator`, `Activity`, `Entity`, `Client`).
    pub kind: &'static str,
    /// Binding name declared on the trigger decorator, when present.
    pub binding: Option<String>,
    /// File the function is defined in.
    pub file: PathBuf,
    /// 1-indexed line of the `def`.
    pub line: usize,
}

impl FunctionRecord {
    pub(crate) fn from_function(function: &DurableFunction) -> Self {
        Self {
            name: function.registered_name.to_string(),
            kind: function.kind.as_str(),
            binding: function.declared_binding.as_ref().map(ToString::to_string),
            file: function.file.as_ref().clone(),
            line: function.line,
        }
    }
}

/// Summary counters for one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisSummary {
    /// Total number of files analyzed.
    pub total_files: usize,
    /// Total number of directories visited.
    pub total_directories: usize,
    /// Total number of source lines analyzed.
    pub total_lines_analyzed: usize,
    /// Number of orchestrator functions discovered.
    pub orchestrators_count: usize,
    /// Number of activity functions discovered.
    pub activities_count: usize,
    /// Number of durable entities discovered.
    pub entities_count: usize,
    /// Number of client binding functions discovered.
    pub client_bindings_count: usize,
    /// Number of findings after filtering.
    pub findings_count: usize,
    /// Number of findings that carry an automatic fix.
    pub fixable_count: usize,
    /// Number of files that failed to parse.
    pub parse_errors_count: usize,
    /// Wall-clock analysis time in seconds.
    pub elapsed_seconds: f64,
}

/// Complete result of an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// All findings, sorted by file, line, column and rule id.
    pub findings: Vec<Finding>,
    /// All discovered durable function registrations.
    pub functions: Vec<FunctionRecord>,
    /// Files that could not be parsed.
    pub parse_errors: Vec<ParseError>,
    /// Summary counters.
    pub analysis_summary: AnalysisSummary,
}
