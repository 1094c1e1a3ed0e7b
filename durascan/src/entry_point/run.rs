use crate::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;

use crate::entry_point::config::setup_configuration;
use crate::entry_point::handlers::{handle_analysis, handle_functions, handle_rules};
use crate::entry_point::paths::{
    collect_all_target_paths, resolve_analysis_context, validate_path_args,
};

/// Runs the analyzer with the given arguments using stdout as the writer.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run DuraScan with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["durascan".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    // Explicit runtime validation for mutual exclusivity of --root and positional paths
    if let Err(code) = validate_path_args(&cli_var.paths) {
        return Ok(code);
    }

    let all_target_paths = collect_all_target_paths(&cli_var);
    let (effective_paths, analysis_root) = resolve_analysis_context(&cli_var, &all_target_paths);

    let app_config = setup_configuration(&effective_paths, &cli_var);
    let config = app_config.config;
    let exclude_folders = app_config.exclude_folders;
    let include_folders = app_config.include_folders;
    let include_tests = app_config.include_tests;

    if cli_var.output.verbose && !cli_var.output.json {
        eprintln!("[VERBOSE] DuraScan v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
        if let Some(ref command) = cli_var.command {
            eprintln!("[VERBOSE] Executing subcommand: {command:?}");
        }
        eprintln!("[VERBOSE] Global Excludes: {exclude_folders:?}");
        eprintln!();
    }

    if let Some(command) = cli_var.command {
        match command {
            Commands::Rules { json } => handle_rules(json, writer),
            Commands::Functions { args } => handle_functions(
                args,
                &exclude_folders,
                &include_folders,
                &analysis_root,
                include_tests,
                &config,
                cli_var.output.verbose,
                writer,
            ),
            Commands::Init => {
                crate::commands::run_init_in(&analysis_root, writer)?;
                Ok(0)
            }
        }
    } else {
        handle_analysis(
            &effective_paths,
            &analysis_root,
            &cli_var,
            &config,
            &exclude_folders,
            &include_folders,
            writer,
        )
    }
}
