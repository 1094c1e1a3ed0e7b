//! DuraScan - replay-safety static analysis for Azure Durable Functions in Python.
//!
//! Durable orchestrator code is replayed from history, so anything
//! non-deterministic (wall-clock time, fresh GUIDs, network I/O, blocking
//! sleeps) silently corrupts orchestration state. DuraScan parses a project
//! with the ruff AST crates, discovers orchestrators, activities, entities
//! and client bindings, and reports the code paths that break replay, with
//! auto-fixes for the mechanical cases.

/// Main analysis engine (two-phase: discovery then lint).
pub mod analyzer;
/// Command-line interface definitions.
pub mod cli;
/// Subcommand implementations (fix, init).
pub mod commands;
/// Configuration loading (.durascan.toml / pyproject.toml).
pub mod config;
/// Shared constants, API tables and compiled regexes.
pub mod constants;
/// Durable Functions model: discovery, function index, replay scope.
pub mod durable;
/// Shared CLI entry point used by every binary.
pub mod entry_point;
/// Byte-range source rewriting for auto-fixes.
pub mod fix;
/// Terminal output (tables, summaries, progress).
pub mod output;
/// Machine-readable report formats (GitHub annotations, SARIF).
pub mod report;
/// Lint rules and the rule metadata registry.
pub mod rules;
/// Small shared utilities (line index, suppression, path helpers).
pub mod utils;

pub use analyzer::{AnalysisResult, AnalysisSummary, DuraScan, ParseError};
pub use rules::{Finding, Fix};
