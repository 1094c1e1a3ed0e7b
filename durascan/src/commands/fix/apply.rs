use super::plan::PlannedFix;
use super::{FixOptions, FixOutcome};
use crate::fix::{filter_overlapping_edits, validate_fixed_source, ByteRangeRewriter};

use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::Path;

pub(super) fn apply_fixes_to_file<W: Write>(
    writer: &mut W,
    file_path: &Path,
    fixes: &[PlannedFix],
    options: &FixOptions,
) -> Result<Option<FixOutcome>> {
    let file_path = crate::utils::validate_output_path(file_path, Some(&options.analysis_root))?;

    let Some(content) = read_source_or_report(writer, &file_path)? else {
        return Ok(None);
    };

    if options.dry_run {
        write_dry_run(writer, &file_path, fixes)?;
        return Ok(None);
    }

    let edits = filter_overlapping_edits(
        fixes
            .iter()
            .flat_map(|fix| fix.edits.iter().cloned())
            .collect(),
    );
    if edits.is_empty() {
        return Ok(None);
    }
    let edits_applied = edits.len();

    let mut rewriter = ByteRangeRewriter::new(content);
    rewriter.add_edits(edits);
    let fixed = match rewriter.apply() {
        Ok(fixed) => fixed,
        Err(e) => {
            writeln!(
                writer,
                "  {} {}: {}",
                "Skip:".yellow(),
                crate::utils::normalize_display_path(&file_path),
                e
            )?;
            return Ok(None);
        }
    };

    if !validate_fixed_source(&fixed) {
        writeln!(
            writer,
            "  {} {}: Produced invalid Python after fix",
            "Skip:".yellow(),
            crate::utils::normalize_display_path(&file_path),
        )?;
        return Ok(None);
    }

    let mut rule_ids: Vec<String> = fixes.iter().map(|fix| fix.rule_id.clone()).collect();
    rule_ids.sort_unstable();
    rule_ids.dedup();

    fs::write(&file_path, fixed)?;
    writeln!(
        writer,
        "  {} {} ({} edit(s))",
        "Fixed:".green(),
        crate::utils::normalize_display_path(&file_path),
        edits_applied
    )?;
    Ok(Some(FixOutcome {
        file: file_path.to_string_lossy().to_string(),
        edits_applied,
        rule_ids,
    }))
}

fn read_source_or_report<W: Write>(writer: &mut W, file_path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => {
            writeln!(
                writer,
                "  {} {}: {}",
                "Skip:".yellow(),
                crate::utils::normalize_display_path(file_path),
                e
            )?;
            Ok(None)
        }
    }
}

fn write_dry_run<W: Write>(
    writer: &mut W,
    file_path: &Path,
    fixes: &[PlannedFix],
) -> Result<()> {
    writeln!(
        writer,
        "  {}:",
        crate::utils::normalize_display_path(file_path).bold()
    )?;
    for fix in fixes {
        writeln!(
            writer,
            "    Line {}: {} [{}]",
            fix.line.to_string().cyan(),
            fix.title,
            fix.rule_id.dimmed()
        )?;
    }
    Ok(())
}
