use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for DuraScan.
    pub durascan: DuraScanConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
/// Configuration options for DuraScan.
pub struct DuraScanConfig {
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to include.
    pub include_folders: Option<Vec<String>>,
    /// Whether to include test files.
    pub include_tests: Option<bool>,
    /// List of rule codes to ignore.
    pub ignore: Option<Vec<String>>,
    /// Per-file ignore overrides (glob -> rule IDs).
    #[serde(alias = "per-file-ignores")]
    pub per_file_ignores: Option<FxHashMap<String, Vec<String>>>,
    /// Lowest severity that should be reported (`low`, `medium`, `high`, `critical`).
    #[serde(alias = "min-severity")]
    pub min_severity: Option<String>,
    /// Whether the analysis exit code should be non-zero when findings remain.
    pub fail_on_findings: Option<bool>,
    /// Decorator names that mark a function as intentionally deterministic,
    /// pulling it into the replay scope without an orchestration trigger.
    pub deterministic_decorators: Vec<String>,
    /// Extra decorator names treated like `orchestration_trigger`.
    pub orchestrator_decorators: Vec<String>,
    /// Extra decorator names treated like `activity_trigger`.
    pub activity_decorators: Vec<String>,
    /// Additional module prefixes flagged as I/O clients inside orchestrators.
    pub extra_io_modules: Vec<String>,
}

impl Default for DuraScanConfig {
    fn default() -> Self {
        DuraScanConfig {
            exclude_folders: None,
            include_folders: None,
            include_tests: None,
            ignore: None,
            per_file_ignores: None,
            min_severity: None,
            fail_on_findings: None,
            deterministic_decorators: vec![String::from("deterministic")],
            orchestrator_decorators: Vec::new(),
            activity_decorators: Vec::new(),
            extra_io_modules: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub(super) struct PyProject {
    pub(super) tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub(super) struct ToolConfig {
    pub(super) durascan: DuraScanConfig,
}
