use crate::analyzer::AnalysisResult;
use crate::rules::Finding;
use colored::Colorize;
use std::io::Write;

use super::summary::print_header;
use super::tables::{print_findings, print_parse_errors};

/// Print the full report, with findings grouped by rule category.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_report(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    print_header(writer)?;

    let total_issues = result.findings.len() + result.parse_errors.len();
    if total_issues == 0 {
        writeln!(writer, "{}", "✓ Replay-safe! No issues found.".green())?;
        return Ok(());
    }

    let mut determinism: Vec<Finding> = Vec::new();
    let mut bindings: Vec<Finding> = Vec::new();
    let mut activities: Vec<Finding> = Vec::new();
    for finding in &result.findings {
        match finding.category.as_str() {
            "Binding" => bindings.push(finding.clone()),
            "Activity" => activities.push(finding.clone()),
            _ => determinism.push(finding.clone()),
        }
    }

    print_findings(writer, "Determinism Issues", &determinism)?;
    print_findings(writer, "Binding Issues", &bindings)?;
    print_findings(writer, "Activity Call Issues", &activities)?;
    print_parse_errors(writer, &result.parse_errors)?;

    if result.analysis_summary.fixable_count > 0 {
        writeln!(
            writer,
            "{}",
            format!(
                "[*] {} finding(s) have an automatic fix; run with --fix to preview it.",
                result.analysis_summary.fixable_count
            )
            .dimmed()
        )?;
    }
    Ok(())
}

/// Print a quiet report (no detailed tables) for CI/CD mode.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report_quiet(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(writer)?;

    writeln!(
        writer,
        "\n[SUMMARY] {} replay-safety issues, {} parse errors",
        result.findings.len(),
        result.parse_errors.len()
    )?;

    Ok(())
}
