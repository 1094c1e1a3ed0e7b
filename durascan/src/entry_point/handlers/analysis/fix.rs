use anyhow::Result;

pub(crate) fn run_fix_if_requested<W: std::io::Write>(
    cli_var: &crate::cli::Cli,
    analysis_root: &std::path::Path,
    result: &crate::analyzer::AnalysisResult,
    writer: &mut W,
) -> Result<()> {
    if cli_var.fix {
        if cli_var.output.verbose && !cli_var.output.json {
            eprintln!("[VERBOSE] Fix mode enabled");
            eprintln!(
                "   Mode: {}",
                if cli_var.apply {
                    "apply changes"
                } else {
                    "dry-run (preview)"
                }
            );
            eprintln!();
        }
        let fix_options = crate::commands::FixOptions {
            dry_run: !cli_var.apply,
            verbose: cli_var.output.verbose,
            analysis_root: analysis_root.to_path_buf(),
        };
        crate::commands::run_fix(result, &fix_options, &mut *writer)?;
    }
    Ok(())
}
