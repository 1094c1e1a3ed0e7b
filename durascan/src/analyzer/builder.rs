//! Constructors and builder-style configuration for [`DuraScan`].

use super::{DuraScan, PerFileIgnoreRule};
use crate::config::Config;
use crate::rules::rule_registry::RuleSeverity;
use crate::utils::collect_python_files;
use globset::GlobBuilder;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

impl DuraScan {
    /// Creates a new analyzer with the given traversal options.
    #[must_use]
    pub fn new(
        include_tests: bool,
        exclude_folders: Option<Vec<String>>,
        include_folders: Option<Vec<String>>,
    ) -> Self {
        Self {
            include_tests,
            exclude_folders: exclude_folders.unwrap_or_default(),
            include_folders: include_folders.unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Sets the analysis root used for relative paths and module names.
    #[must_use]
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.analysis_root = root;
        self
    }

    /// Enables or disables verbose logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the configuration and rebuilds the per-file ignore matchers.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.rebuild_per_file_ignore_rules();
        self
    }

    /// Sets the minimum severity below which findings are dropped.
    #[must_use]
    pub fn with_min_severity(mut self, min_severity: Option<RuleSeverity>) -> Self {
        self.min_severity = min_severity;
        self
    }

    /// Adds rule IDs to ignore globally, on top of the config `ignore` list.
    #[must_use]
    pub fn with_ignored_rules(mut self, ignored_rules: Vec<String>) -> Self {
        self.ignored_rules = ignored_rules;
        self
    }

    /// Counts the Python files that an analysis of `paths` would visit.
    ///
    /// Used to size the progress bar before the run starts, so it applies
    /// the same folder and test-file filters as [`DuraScan::analyze_paths`].
    #[must_use]
    pub fn count_files(&self, paths: &[PathBuf]) -> usize {
        paths
            .iter()
            .map(|path| {
                let (files, _) = collect_python_files(
                    path,
                    &self.exclude_folders,
                    &self.include_folders,
                    false,
                );
                files.iter().filter(|file| self.should_lint(file)).count()
            })
            .sum()
    }

    pub(crate) fn should_lint(&self, file: &Path) -> bool {
        self.include_tests || !crate::utils::is_test_path(&file.to_string_lossy())
    }

    pub(crate) fn rebuild_per_file_ignore_rules(&mut self) {
        self.per_file_ignore_rules = self
            .config
            .durascan
            .per_file_ignores
            .as_ref()
            .map(Self::build_per_file_ignore_rules)
            .unwrap_or_default();
    }

    fn build_per_file_ignore_rules(
        per_file_ignores: &rustc_hash::FxHashMap<String, Vec<String>>,
    ) -> Vec<PerFileIgnoreRule> {
        let mut rules = Vec::new();
        for (pattern, rule_ids) in per_file_ignores {
            let normalized_ids: FxHashSet<String> = rule_ids
                .iter()
                .map(|id| id.trim().to_uppercase())
                .filter(|id| !id.is_empty())
                .collect();
            if normalized_ids.is_empty() {
                continue;
            }

            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => rules.push(PerFileIgnoreRule {
                    matcher: glob.compile_matcher(),
                    rule_ids: normalized_ids,
                }),
                Err(err) => {
                    eprintln!("WARN: invalid per-file-ignores pattern '{pattern}': {err}");
                }
            }
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuraScanConfig;

    fn config_with_per_file_ignores(pairs: &[(&str, &[&str])]) -> Config {
        let mut per_file_ignores = rustc_hash::FxHashMap::default();
        for (pattern, ids) in pairs {
            per_file_ignores.insert(
                (*pattern).to_string(),
                ids.iter().map(|id| (*id).to_string()).collect(),
            );
        }
        Config {
            durascan: DuraScanConfig {
                per_file_ignores: Some(per_file_ignores),
                ..DuraScanConfig::default()
            },
            config_file_path: None,
        }
    }

    #[test]
    fn test_per_file_ignores_match_relative_path() {
        let config = config_with_per_file_ignores(&[("legacy/*.py", &["DS-N103"])]);
        let analyzer = DuraScan::new(false, None, None)
            .with_root(PathBuf::from("/project"))
            .with_config(config);

        assert!(
            analyzer.is_rule_ignored_for_path(Path::new("/project/legacy/worker.py"), "DS-N103")
        );
        assert!(!analyzer.is_rule_ignored_for_path(Path::new("/project/app.py"), "DS-N103"));
        assert!(
            !analyzer.is_rule_ignored_for_path(Path::new("/project/legacy/worker.py"), "DS-N101")
        );
    }

    #[test]
    fn test_per_file_ignores_literal_separator() {
        // A single `*` must not cross directory boundaries.
        let config = config_with_per_file_ignores(&[("*.py", &["DS-B201"])]);
        let analyzer = DuraScan::new(false, None, None)
            .with_root(PathBuf::from("/project"))
            .with_config(config);

        assert!(analyzer.is_rule_ignored_for_path(Path::new("/project/app.py"), "DS-B201"));
        assert!(!analyzer.is_rule_ignored_for_path(Path::new("/project/pkg/app.py"), "DS-B201"));
    }

    #[test]
    fn test_per_file_ignores_case_insensitive_rule_ids() {
        let config = config_with_per_file_ignores(&[("scripts/**", &["ds-n105"])]);
        let analyzer = DuraScan::new(false, None, None)
            .with_root(PathBuf::from("/project"))
            .with_config(config);

        assert!(
            analyzer.is_rule_ignored_for_path(Path::new("/project/scripts/job.py"), "DS-N105")
        );
    }
}
