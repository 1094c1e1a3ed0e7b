//! DuraScan analyzer module.
//!
//! This module contains the analysis engine, broken down into:
//! - `types`: Result types (`AnalysisResult`, `ParseError`, `AnalysisSummary`)
//! - `single_file`: per-file discovery and lint passes
//! - `traversal`: the two-phase parallel run over a file set
//! - `aggregation`: merging per-file output into one result
//!
//! The engine runs in two phases because the rules need cross-file facts:
//! discovery first parses every file and builds the durable function index,
//! then the lint pass re-walks each file against that shared index.

mod aggregation;
mod builder;
pub mod single_file;
mod traversal;

/// Result types and analysis summaries.
pub mod types;

// Re-export types for public API
pub use types::{AnalysisResult, AnalysisSummary, FunctionRecord, ParseError};

use crate::config::Config;
use crate::rules::rule_registry::RuleSeverity;
use globset::GlobMatcher;
use rustc_hash::FxHashSet;

pub(crate) struct PerFileIgnoreRule {
    matcher: GlobMatcher,
    rule_ids: FxHashSet<String>,
}

/// Main analyzer state and runtime configuration.
pub struct DuraScan {
    /// Whether to include test files in the analysis.
    pub include_tests: bool,
    /// Folders to exclude from analysis.
    pub exclude_folders: Vec<String>,
    /// Folders to force-include in analysis (overrides default exclusions).
    pub include_folders: Vec<String>,
    /// Lowest severity to report; findings below it are dropped.
    pub min_severity: Option<RuleSeverity>,
    /// Rule IDs ignored everywhere (on top of the config `ignore` list).
    pub ignored_rules: Vec<String>,
    /// Total number of files analyzed.
    pub total_files_analyzed: usize,
    /// Total number of lines analyzed.
    pub total_lines_analyzed: usize,
    /// Configuration object.
    pub config: Config,
    /// Progress bar for tracking analysis progress (thread-safe).
    pub progress_bar: Option<std::sync::Arc<indicatif::ProgressBar>>,
    /// Whether to enable verbose logging.
    pub verbose: bool,
    /// Analysis root for path containment and relative resolution.
    pub analysis_root: std::path::PathBuf,
    per_file_ignore_rules: Vec<PerFileIgnoreRule>,
}

impl Default for DuraScan {
    fn default() -> Self {
        Self {
            include_tests: false,
            exclude_folders: Vec::new(),
            include_folders: Vec::new(),
            min_severity: None,
            ignored_rules: Vec::new(),
            total_files_analyzed: 0,
            total_lines_analyzed: 0,
            config: Config::default(),
            progress_bar: None,
            verbose: false,
            analysis_root: std::path::PathBuf::from("."),
            per_file_ignore_rules: Vec::new(),
        }
    }
}

impl DuraScan {
    /// Returns whether a rule id should be ignored for a given file path.
    #[must_use]
    pub fn is_rule_ignored_for_path(&self, file_path: &std::path::Path, rule_id: &str) -> bool {
        if self.per_file_ignore_rules.is_empty() {
            return false;
        }

        let normalized_rule_id = rule_id.trim().to_uppercase();
        if normalized_rule_id.is_empty() {
            return false;
        }

        let relative_path = match file_path.strip_prefix(&self.analysis_root) {
            Ok(p) => p,
            Err(_) => file_path,
        };

        let normalized_path = Self::normalize_glob_path(relative_path);
        self.per_file_ignore_rules.iter().any(|rule| {
            rule.rule_ids.contains(&normalized_rule_id) && rule.matcher.is_match(&normalized_path)
        })
    }

    #[must_use]
    fn normalize_glob_path(path: &std::path::Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}
