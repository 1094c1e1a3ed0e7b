mod commands;
mod options;

pub use commands::Commands;
pub use options::{FunctionsArgs, OutputFormat, OutputOptions, PathArgs, RuleOptions, SeverityArg};

use clap::Parser;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.durascan.toml):
  Create this file in your project root to set defaults.

  [durascan]
  # Core settings
  include_tests = false      # Include test files in analysis
  min_severity = \"low\"       # Report floor: low, medium, high, or critical
  fail_on_findings = false   # Exit 1 when any finding is reported

  # Rule tuning
  ignore = [\"DS-N103\"]       # Rule IDs suppressed everywhere
  deterministic_decorators = [\"replay_safe\"]  # Decorators that opt helpers into checking
  extra_io_modules = [\"internal.sdk\"]         # Extra module prefixes flagged as I/O clients

  # Path filters
  exclude_folders = [\"build\", \"dist\", \".venv\"]
  include_folders = [\"src\"]  # Force-include these

  # Per-file rule ignores (glob -> rule IDs)
  per-file-ignores = { \"tests/*\" = [\"DS-N101\"], \"samples/*\" = [\"DS-A301\"] }
";

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DuraScan - Replay-safety linting for Python durable orchestrations",
    long_about = None,
    after_help = CONFIG_HELP
)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute (e.g., rules, functions, init).
    pub command: Option<Commands>,

    /// Global path options (paths vs root).
    #[command(flatten)]
    pub paths: PathArgs,

    /// Rule tuning options (severity floor, ignored rules).
    #[command(flatten)]
    pub rules: RuleOptions,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Folders to exclude from analysis.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include in analysis (overrides default exclusions).
    #[arg(long, alias = "include-folder")]
    pub include_folders: Vec<String>,

    /// Include test files in analysis.
    #[arg(long)]
    pub include_tests: bool,

    /// Rewrite findings that carry an automatic fix (replay-unsafe calls are
    /// swapped for their context-based equivalents).
    /// By default, shows a preview of what would be changed (dry-run).
    /// Use --apply to actually modify files.
    #[arg(long)]
    pub fix: bool,

    /// Apply the fixes to files (use with --fix).
    /// Without this flag, --fix only shows a preview of what would be changed.
    #[arg(short = 'a', long)]
    pub apply: bool,
}
