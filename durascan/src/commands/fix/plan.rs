use crate::fix::Edit;

use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// One finding's rewrite, detached from the finding so the fix pass owns it.
#[derive(Debug, Clone)]
pub(super) struct PlannedFix {
    pub(super) rule_id: String,
    pub(super) title: String,
    pub(super) line: usize,
    pub(super) edits: Vec<Edit>,
}

/// Groups fixable findings by file. A `BTreeMap` keeps preview and apply
/// order stable across runs.
pub(super) fn collect_fixes(
    results: &crate::analyzer::AnalysisResult,
) -> BTreeMap<PathBuf, Vec<PlannedFix>> {
    let mut fixes_by_file: BTreeMap<PathBuf, Vec<PlannedFix>> = BTreeMap::new();

    for finding in &results.findings {
        let Some(fix) = &finding.fix else {
            continue;
        };
        fixes_by_file
            .entry(finding.file.clone())
            .or_default()
            .push(PlannedFix {
                rule_id: finding.rule_id.clone(),
                title: fix.title.clone(),
                line: finding.line,
                edits: fix.edits.clone(),
            });
    }

    for fixes in fixes_by_file.values_mut() {
        fixes.sort_by_key(|fix| fix.line);
    }

    fixes_by_file
}

pub(super) fn print_fix_stats<W: Write>(
    writer: &mut W,
    fixes_by_file: &BTreeMap<PathBuf, Vec<PlannedFix>>,
) -> Result<()> {
    let total_fixes: usize = fixes_by_file.values().map(Vec::len).sum();
    writeln!(
        writer,
        "  {} fix(es) across {} file(s)",
        total_fixes,
        fixes_by_file.len()
    )?;
    Ok(())
}
