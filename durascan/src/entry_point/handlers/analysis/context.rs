use crate::rules::rule_registry::RuleSeverity;

pub(crate) struct AnalysisContext {
    pub(crate) include_tests: bool,
    pub(crate) min_severity: Option<RuleSeverity>,
    pub(crate) ignored_rules: Vec<String>,
    pub(crate) fail_on_findings: bool,
    pub(crate) exclude_folders: Vec<String>,
    pub(crate) include_folders: Vec<String>,
    pub(crate) is_structured: bool,
}

pub(crate) fn build_analysis_context(
    cli_var: &crate::cli::Cli,
    config: &crate::config::Config,
    base_exclude_folders: &[String],
    base_include_folders: &[String],
) -> AnalysisContext {
    let include_tests = cli_var.include_tests || config.durascan.include_tests.unwrap_or(false);

    // CLI floor only: the analyzer itself takes the stricter of this and the
    // configured min_severity, so both stay in force.
    let min_severity = cli_var.rules.min_severity.map(crate::cli::SeverityArg::as_severity);

    let fail_on_findings =
        cli_var.output.fail_on_findings || config.durascan.fail_on_findings.unwrap_or(false);

    let is_structured = cli_var.output.json
        || matches!(
            cli_var.output.format,
            crate::cli::OutputFormat::Json
                | crate::cli::OutputFormat::Github
                | crate::cli::OutputFormat::Sarif
        );

    AnalysisContext {
        include_tests,
        min_severity,
        ignored_rules: cli_var.rules.ignore.clone(),
        fail_on_findings,
        exclude_folders: base_exclude_folders.to_vec(),
        include_folders: base_include_folders.to_vec(),
        is_structured,
    }
}
