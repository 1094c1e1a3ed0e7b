use crate::rules::rule_registry::RuleSeverity;
use clap::Args;
use std::path::PathBuf;

/// Severity floor accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
pub enum SeverityArg {
    /// Report everything.
    Low,
    /// Report medium severity and above.
    Medium,
    /// Report high severity and above.
    High,
    /// Report only critical findings.
    Critical,
}

impl SeverityArg {
    /// Maps the CLI value onto the registry severity scale.
    #[must_use]
    pub const fn as_severity(self) -> RuleSeverity {
        match self {
            SeverityArg::Low => RuleSeverity::Low,
            SeverityArg::Medium => RuleSeverity::Medium,
            SeverityArg::High => RuleSeverity::High,
            SeverityArg::Critical => RuleSeverity::Critical,
        }
    }
}

/// Options for rule selection and severity filtering.
#[derive(Args, Debug, Default, Clone)]
pub struct RuleOptions {
    /// Lowest severity to report. Findings below this level are dropped.
    #[arg(long, value_enum)]
    pub min_severity: Option<SeverityArg>,

    /// Rule IDs to ignore everywhere (repeatable).
    #[arg(long = "ignore", alias = "ignore-rule")]
    pub ignore: Vec<String>,
}

/// Supported output formats for scan results.
#[derive(Debug, Clone, clap::ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standard plain text table.
    #[default]
    Text,
    /// Raw JSON format.
    Json,
    /// `GitHub` Annotations (via workflow commands).
    Github,
    /// SARIF (Static Analysis Results Interchange Format).
    Sarif,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output for debugging (shows files being analyzed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only summary, time, and gate results (no detailed tables).
    #[arg(long)]
    pub quiet: bool,

    /// Exit with code 1 if any finding is reported.
    #[arg(long)]
    pub fail_on_findings: bool,
}

/// Shared path arguments (mutually exclusive paths/root).
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Paths to analyze (files or directories).
    /// Can be a single directory, multiple files, or a mix of both.
    /// When no paths are provided, defaults to the current directory.
    /// Cannot be used with --root.
    #[arg(conflicts_with = "root")]
    pub paths: Vec<PathBuf>,

    /// Project root for path containment and analysis.
    /// Use this instead of positional paths when running from a different directory.
    /// When specified, this path is used as both the analysis target AND the
    /// security containment boundary for file operations.
    /// Cannot be used together with positional path arguments.
    #[arg(long, conflicts_with = "paths")]
    pub root: Option<PathBuf>,
}

/// Common options for the functions subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct FunctionsArgs {
    /// Path options (paths vs root).
    #[command(flatten)]
    pub paths: PathArgs,

    /// Output JSON.
    #[arg(long)]
    pub json: bool,

    /// Exclude folders.
    #[arg(long, alias = "exclude-folder")]
    pub exclude: Vec<String>,
}
