use crate::analyzer::{AnalysisResult, AnalysisSummary};
use colored::Colorize;
use std::io::Write;

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Durable Replay Safety Report          ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print summary with colored "pills".
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary_pills(
    writer: &mut impl Write,
    result: &AnalysisResult,
) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }

    let mut determinism = 0;
    let mut bindings = 0;
    let mut activities = 0;
    for finding in &result.findings {
        match finding.category.as_str() {
            "Binding" => bindings += 1,
            "Activity" => activities += 1,
            _ => determinism += 1,
        }
    }

    writeln!(
        writer,
        "{}  {}  {}  {}  {}",
        pill("Determinism", determinism),
        pill("Bindings", bindings),
        pill("Activities", activities),
        pill("Fixable", result.analysis_summary.fixable_count),
        pill("Parse Errors", result.parse_errors.len()),
    )?;

    writeln!(writer)?;
    Ok(())
}

/// Print analysis statistics (files, lines, and the durable function inventory).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_analysis_stats(
    writer: &mut impl Write,
    summary: &AnalysisSummary,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!(
            "Analyzed {} files ({} lines)",
            summary.total_files.to_string().bold(),
            summary.total_lines_analyzed.to_string().bold()
        )
        .dimmed()
    )?;

    let functions = summary.orchestrators_count
        + summary.activities_count
        + summary.entities_count
        + summary.client_bindings_count;
    if functions > 0 {
        writeln!(
            writer,
            "Orchestrators: {} | Activities: {} | Entities: {} | Clients: {}",
            summary.orchestrators_count.to_string().cyan().bold(),
            summary.activities_count.to_string().cyan().bold(),
            summary.entities_count.to_string().cyan().bold(),
            summary.client_bindings_count.to_string().cyan().bold()
        )?;
    }
    writeln!(writer)?;
    Ok(())
}
