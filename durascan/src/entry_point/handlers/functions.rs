use anyhow::Result;

use crate::cli::FunctionsArgs;
use crate::entry_point::paths::{merge_excludes, resolve_subcommand_paths};

/// Lists the durable functions discovered under the given paths.
#[allow(clippy::too_many_arguments)]
pub(crate) fn handle_functions<W: std::io::Write>(
    args: FunctionsArgs,
    base_exclude_folders: &[String],
    base_include_folders: &[String],
    analysis_root: &std::path::Path,
    include_tests: bool,
    config: &crate::config::Config,
    verbose: bool,
    writer: &mut W,
) -> Result<i32> {
    let paths = match resolve_subcommand_paths(args.paths.paths, args.paths.root) {
        Ok(paths) => paths,
        Err(code) => return Ok(code),
    };

    let exclude_folders = merge_excludes(args.exclude, base_exclude_folders);

    let mut analyzer = crate::analyzer::DuraScan::new(
        include_tests,
        Some(exclude_folders),
        Some(base_include_folders.to_vec()),
    )
    .with_config(config.clone())
    .with_verbose(verbose)
    .with_root(analysis_root.to_path_buf());

    let result = analyzer.analyze_paths(&paths);

    if args.json {
        writeln!(
            writer,
            "{}",
            serde_json::to_string_pretty(&result.functions)?
        )?;
    } else {
        if result.functions.is_empty() {
            writeln!(writer, "No durable functions found.")?;
        } else {
            crate::output::print_functions(writer, "Durable Functions", &result.functions)?;
        }
        writeln!(
            writer,
            "{} durable function(s) across {} file(s)",
            result.functions.len(),
            result.analysis_summary.total_files
        )?;
        if !result.parse_errors.is_empty() {
            crate::output::print_parse_errors(writer, &result.parse_errors)?;
        }
    }

    Ok(0)
}
