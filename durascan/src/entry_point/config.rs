use crate::cli::Cli;

pub(crate) struct AppConfig {
    pub(crate) config: crate::config::Config,
    pub(crate) exclude_folders: Vec<String>,
    pub(crate) include_folders: Vec<String>,
    pub(crate) include_tests: bool,
}

/// Loads project configuration and merges it with CLI flags.
pub(crate) fn setup_configuration(effective_paths: &[std::path::PathBuf], cli: &Cli) -> AppConfig {
    let config_path = effective_paths
        .first()
        .map_or(std::path::Path::new("."), std::path::PathBuf::as_path);
    let config = crate::config::Config::load_from_path(config_path);

    let mut exclude_folders = config.durascan.exclude_folders.clone().unwrap_or_default();
    exclude_folders.extend(cli.exclude_folders.clone());

    let include_tests = cli.include_tests || config.durascan.include_tests.unwrap_or(false);

    let mut include_folders = config.durascan.include_folders.clone().unwrap_or_default();
    include_folders.extend(cli.include_folders.clone());

    AppConfig {
        config,
        exclude_folders,
        include_folders,
        include_tests,
    }
}
