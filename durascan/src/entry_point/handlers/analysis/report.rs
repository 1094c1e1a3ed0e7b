use anyhow::Result;
use colored::Colorize;

use super::context::AnalysisContext;
use super::run::AnalysisRun;

pub(crate) fn report_results<W: std::io::Write>(
    cli_var: &crate::cli::Cli,
    analysis_root: &std::path::Path,
    context: &AnalysisContext,
    run: &AnalysisRun,
    writer: &mut W,
) -> Result<()> {
    let result = &run.result;

    if cli_var.output.verbose && !context.is_structured {
        print_verbose_stats(result, run);
    }

    output_results(cli_var, analysis_root, result, writer)?;

    if !context.is_structured {
        print_summary(cli_var, result, run, writer)?;
    }

    Ok(())
}

fn print_verbose_stats(result: &crate::analyzer::AnalysisResult, run: &AnalysisRun) {
    let elapsed = run.start_time.elapsed();
    eprintln!(
        "[VERBOSE] Analysis completed in {:.2}s",
        elapsed.as_secs_f64()
    );
    eprintln!("   Files analyzed: {}", result.analysis_summary.total_files);
    eprintln!(
        "   Lines analyzed: {}",
        result.analysis_summary.total_lines_analyzed
    );
    eprintln!("[VERBOSE] Findings breakdown:");
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
    eprintln!("   Determinism: {determinism}");
    eprintln!("   Bindings: {bindings}");
    eprintln!("   Activity calls: {activities}");
    eprintln!("   Parse errors: {}", result.parse_errors.len());

    let mut file_counts = collect_issue_counts(result);
    if !file_counts.is_empty() {
        file_counts.sort_by(|a, b| b.1.cmp(&a.1));
        eprintln!("[VERBOSE] Files with most issues:");
        for (file, count) in file_counts.iter().take(5) {
            eprintln!("   {count:3} issues: {file}");
        }
    }
    eprintln!();
}

fn collect_issue_counts(result: &crate::analyzer::AnalysisResult) -> Vec<(String, usize)> {
    let mut file_counts = std::collections::HashMap::new();
    for finding in &result.findings {
        *file_counts
            .entry(crate::utils::normalize_display_path(&finding.file))
            .or_insert(0) += 1;
    }

    file_counts.into_iter().collect()
}

fn output_results<W: std::io::Write>(
    cli_var: &crate::cli::Cli,
    analysis_root: &std::path::Path,
    result: &crate::analyzer::AnalysisResult,
    writer: &mut W,
) -> Result<()> {
    if cli_var.output.json || cli_var.output.format == crate::cli::OutputFormat::Json {
        writeln!(writer, "{}", serde_json::to_string_pretty(result)?)?;
        return Ok(());
    }

    match cli_var.output.format {
        crate::cli::OutputFormat::Text => {
            if cli_var.output.quiet {
                crate::output::print_report_quiet(writer, result)?;
            } else {
                crate::output::print_report(writer, result)?;
            }
        }
        crate::cli::OutputFormat::Github => {
            crate::report::github::print_github_with_root(writer, result, Some(analysis_root))?;
        }
        crate::cli::OutputFormat::Sarif => {
            crate::report::sarif::print_sarif_with_root(writer, result, Some(analysis_root))?;
        }
        crate::cli::OutputFormat::Json => unreachable!(),
    }

    Ok(())
}

fn print_summary<W: std::io::Write>(
    cli_var: &crate::cli::Cli,
    result: &crate::analyzer::AnalysisResult,
    run: &AnalysisRun,
    writer: &mut W,
) -> Result<()> {
    if !cli_var.output.quiet {
        writeln!(
            writer,
            "\n[SUMMARY] {} replay-safety issues, {} parse errors",
            result.findings.len(),
            result.parse_errors.len()
        )?;
        crate::output::print_summary_pills(writer, result)?;
        crate::output::print_analysis_stats(writer, &result.analysis_summary)?;
    }

    writeln!(
        writer,
        "{} in {:.2}s",
        "Analysis completed".green().bold(),
        run.start_time.elapsed().as_secs_f64()
    )?;

    Ok(())
}
