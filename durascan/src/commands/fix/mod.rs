//! Replay-safety fix command.

mod apply;
mod plan;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Options for applying rule fixes.
#[derive(Debug, Default)]
pub struct FixOptions {
    /// Dry-run mode (show what would change)
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
    /// Analysis root for path containment
    pub analysis_root: PathBuf,
}

/// Result of fixing one file.
#[derive(Debug, Serialize)]
pub struct FixOutcome {
    /// File that was fixed
    pub file: String,
    /// Number of edits applied
    pub edits_applied: usize,
    /// Rule IDs behind the applied edits
    pub rule_ids: Vec<String>,
}

/// Apply --fix to findings that carry a mechanical rewrite.
///
/// # Errors
///
/// Returns an error if file I/O fails or a fix cannot be written back.
pub fn run_fix<W: Write>(
    results: &crate::analyzer::AnalysisResult,
    options: &FixOptions,
    mut writer: W,
) -> Result<Vec<FixOutcome>> {
    if options.dry_run {
        writeln!(
            writer,
            "\n{}",
            "[DRY-RUN] Rewrites that would be applied:".yellow()
        )?;
    } else {
        writeln!(writer, "\n{}", "Applying replay-safety fixes...".cyan())?;
    }

    let fixes_by_file = plan::collect_fixes(results);

    if fixes_by_file.is_empty() {
        writeln!(writer, "  No findings with an automatic fix.")?;
        return Ok(vec![]);
    }

    if options.verbose {
        plan::print_fix_stats(&mut writer, &fixes_by_file)?;
    }

    let mut outcomes = Vec::new();

    for (file_path, fixes) in fixes_by_file {
        if let Some(outcome) = apply::apply_fixes_to_file(&mut writer, &file_path, &fixes, options)?
        {
            outcomes.push(outcome);
        }
    }

    if !outcomes.is_empty() {
        let total_edits: usize = outcomes.iter().map(|outcome| outcome.edits_applied).sum();
        writeln!(writer, "\n{}", "Fix Summary:".green().bold())?;
        writeln!(writer, "  Files changed: {}", outcomes.len())?;
        writeln!(writer, "  Edits applied: {total_edits}")?;
    }

    Ok(outcomes)
}
