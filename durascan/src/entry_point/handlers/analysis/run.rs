use anyhow::Result;

use super::context::AnalysisContext;
use colored::Colorize;
use std::sync::{Mutex, OnceLock};

pub(crate) struct AnalysisRun {
    pub(crate) result: crate::analyzer::AnalysisResult,
    pub(crate) start_time: std::time::Instant,
}

/// Progress bar shared with the interrupt handler so a Ctrl-C mid-scan can
/// clear the terminal before exiting.
static ACTIVE_PROGRESS: OnceLock<Mutex<Option<indicatif::ProgressBar>>> = OnceLock::new();

fn progress_slot() -> &'static Mutex<Option<indicatif::ProgressBar>> {
    ACTIVE_PROGRESS.get_or_init(|| Mutex::new(None))
}

fn install_interrupt_handler() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let outcome = ctrlc::set_handler(|| {
            if let Ok(mut slot) = progress_slot().lock() {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            }
            // 130 = interrupted by SIGINT, matching shell conventions.
            std::process::exit(130);
        });
        if let Err(err) = outcome {
            eprintln!("WARN: could not install interrupt handler: {err}");
        }
    });
}

pub(crate) fn run_analysis<W: std::io::Write>(
    effective_paths: &[std::path::PathBuf],
    analysis_root: &std::path::Path,
    cli_var: &crate::cli::Cli,
    config: &crate::config::Config,
    context: &AnalysisContext,
    writer: &mut W,
) -> Result<AnalysisRun> {
    let start_time = std::time::Instant::now();

    if !context.is_structured && !cfg!(test) {
        let total_rules = crate::rules::rule_registry::all_rule_descriptors().len();
        let mut summary = format!("{total_rules} rules");
        if !context.ignored_rules.is_empty() {
            summary.push_str(&format!(" ({} ignored)", context.ignored_rules.len()));
        }
        if let Some(floor) = context.min_severity {
            summary.push_str(&format!(", min severity {}", floor.as_str()));
        }
        eprintln!("{} {}", "[INFO] Active Checks:".blue().bold(), summary);
        crate::output::print_exclusion_list(writer, &context.exclude_folders)?;
    }

    // Print verbose configuration info (before progress bar)
    if cli_var.output.verbose && !context.is_structured {
        eprintln!("[VERBOSE] Configuration:");
        eprintln!("   Include tests: {}", context.include_tests);
        eprintln!("   Fail on findings: {}", context.fail_on_findings);
        if !context.ignored_rules.is_empty() {
            eprintln!("   Ignored rules: {:?}", context.ignored_rules);
        }
        eprintln!("   Target Path: {effective_paths:?}");
        if !context.exclude_folders.is_empty() {
            eprintln!("   Exclude folders: {:?}", context.exclude_folders);
        }
        eprintln!();
    }

    let mut analyzer = crate::analyzer::DuraScan::new(
        context.include_tests,
        Some(context.exclude_folders.clone()),
        Some(context.include_folders.clone()),
    )
    .with_config(config.clone())
    .with_verbose(cli_var.output.verbose)
    .with_root(analysis_root.to_path_buf())
    .with_min_severity(context.min_severity)
    .with_ignored_rules(context.ignored_rules.clone());

    // Count files first to create progress bar with accurate total
    let total_files = analyzer.count_files(effective_paths);

    // Each file is touched twice (discovery pass, then lint pass), so the bar
    // length is doubled to advance smoothly through both.
    let progress: Option<indicatif::ProgressBar> = if context.is_structured {
        None
    } else if total_files > 0 {
        let pb = crate::output::create_progress_bar((total_files as u64) * 2);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template(
                    "{spinner:.cyan} [{bar:40.cyan/blue}] {percent}% - Checking replay safety...",
                )
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        Some(crate::output::create_spinner())
    };

    if let Some(ref pb) = progress {
        if !cfg!(test) {
            install_interrupt_handler();
            if let Ok(mut slot) = progress_slot().lock() {
                *slot = Some(pb.clone());
            }
        }
        analyzer.progress_bar = Some(std::sync::Arc::new(pb.clone()));
    }

    let result = analyzer.analyze_paths(effective_paths);

    if let Some(ref pb) = progress {
        if let Ok(mut slot) = progress_slot().lock() {
            slot.take();
        }
        pb.finish_and_clear();
    }

    Ok(AnalysisRun { result, start_time })
}
