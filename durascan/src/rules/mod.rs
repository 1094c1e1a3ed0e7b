use crate::config::Config;
use crate::durable::{FunctionIndex, ImportMap, ScopeOrigin};
use crate::fix::Edit;
use crate::utils::LineIndex;
use ruff_python_ast::Expr;
use ruff_text_size::TextSize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use rule_registry::RuleDescriptor;

#[derive(Debug, Clone, Copy)]
/// Context passed to rules during analysis.
pub struct Context<'a> {
    /// Path to the file being analyzed.
    pub file: &'a Path,
    /// Raw source of the file (used when fixes splice argument text).
    pub source: &'a str,
    /// Line index for accurate line/column mapping.
    pub line_index: &'a LineIndex,
    /// Configuration settings.
    pub config: &'a Config,
    /// Import bindings of the file, for dotted-path canonicalization.
    pub imports: &'a ImportMap,
    /// Project-wide durable function index.
    pub index: &'a FunctionIndex,
}

#[derive(Debug, Clone, Copy)]
/// Replay-scope frame surrounding the node a rule is looking at.
pub struct ScopeState<'a> {
    /// Qualified name of the innermost in-scope function.
    pub qualified: &'a str,
    /// How that function entered the replay scope.
    pub origin: ScopeOrigin,
    /// Orchestration context variable, known only under orchestrator roots.
    pub context_var: Option<&'a str>,
    /// Whether the visited expression is itself a whole statement.
    pub at_stmt_level: bool,
}

#[derive(Debug, Clone, Serialize)]
/// A single issue found by a rule.
pub struct Finding {
    /// ID of the rule that triggered the finding.
    pub rule_id: String,
    /// Severity level (e.g., "HIGH", "CRITICAL").
    pub severity: String,
    /// Rule category (e.g., "Determinism").
    pub category: String,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// Line number.
    pub line: usize,
    /// Column number.
    pub col: usize,
    /// Suggested rewrite, when one is mechanical enough to offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

#[derive(Debug, Clone, Serialize)]
/// A mechanical rewrite attached to a finding.
pub struct Fix {
    /// Short description shown in fix previews.
    pub title: String,
    /// Byte-range edits implementing the rewrite.
    pub edits: Vec<Edit>,
}

/// Builds a finding from registry metadata plus a source offset.
#[must_use]
pub fn create_finding(
    descriptor: &RuleDescriptor,
    message: String,
    context: &Context<'_>,
    offset: TextSize,
) -> Finding {
    Finding {
        rule_id: descriptor.id.to_string(),
        severity: descriptor.default_severity.as_str().to_string(),
        category: descriptor.category.as_str().to_string(),
        message,
        file: context.file.to_path_buf(),
        line: context.line_index.line_index(offset),
        col: context.line_index.column_index(offset),
        fix: None,
    }
}

/// Trait defining a linting rule.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str;
    /// Called when visiting an expression. `scope` is `Some` only inside the
    /// replay scope; rules that fire anywhere ignore it.
    fn visit_expr(
        &mut self,
        _expr: &Expr,
        _context: &Context<'_>,
        _scope: Option<&ScopeState<'_>>,
    ) -> Option<Vec<Finding>> {
        None
    }
}

/// Module containing activity invocation rules.
pub mod activity;
/// Module containing trigger-binding checks.
pub mod binding;
/// Module containing replay-determinism rules.
pub mod determinism;
/// Stable rule ID constants.
pub mod ids;
/// Typed metadata for every rule.
pub mod rule_registry;
