use super::*;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(
        config.durascan.deterministic_decorators,
        vec![String::from("deterministic")]
    );
    assert!(config.durascan.ignore.is_none());
    assert!(config.durascan.extra_io_modules.is_empty());
    assert!(config.config_file_path.is_none());
}

#[test]
fn test_load_from_path_no_config() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from_path(dir.path());
    assert!(config.durascan.min_severity.is_none());
    assert_eq!(
        config.durascan.deterministic_decorators,
        vec![String::from("deterministic")]
    );
}

#[test]
fn test_load_from_path_durascan_toml() {
    let dir = TempDir::new().unwrap();
    let mut file = std::fs::File::create(dir.path().join(".durascan.toml")).unwrap();
    writeln!(
        file,
        r#"[durascan]
ignore = ["DS-N103"]
min_severity = "medium"
extra_io_modules = ["internal.sdk"]
"#
    )
    .unwrap();

    let config = Config::load_from_path(dir.path());
    assert_eq!(
        config.durascan.ignore,
        Some(vec![String::from("DS-N103")])
    );
    assert_eq!(config.durascan.min_severity.as_deref(), Some("medium"));
    assert_eq!(
        config.durascan.extra_io_modules,
        vec![String::from("internal.sdk")]
    );
    assert!(config.config_file_path.is_some());
}

#[test]
fn test_load_from_path_pyproject_toml() {
    let dir = TempDir::new().unwrap();
    let mut file = std::fs::File::create(dir.path().join("pyproject.toml")).unwrap();
    writeln!(
        file,
        r#"[tool.durascan]
include_tests = true
deterministic_decorators = ["deterministic", "replay_safe"]
"#
    )
    .unwrap();

    let config = Config::load_from_path(dir.path());
    assert_eq!(config.durascan.include_tests, Some(true));
    assert_eq!(
        config.durascan.deterministic_decorators,
        vec![String::from("deterministic"), String::from("replay_safe")]
    );
}

#[test]
fn test_durascan_toml_wins_over_pyproject() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".durascan.toml"),
        "[durascan]\nfail_on_findings = true\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.durascan]\nfail_on_findings = false\n",
    )
    .unwrap();

    let config = Config::load_from_path(dir.path());
    assert_eq!(config.durascan.fail_on_findings, Some(true));
}

#[test]
fn test_load_from_path_traverses_up() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("src").join("orchestrators");
    std::fs::create_dir_all(&nested).unwrap();

    let mut file = std::fs::File::create(dir.path().join(".durascan.toml")).unwrap();
    writeln!(
        file,
        r#"[durascan]
exclude_folders = ["snapshots"]
"#
    )
    .unwrap();

    let config = Config::load_from_path(&nested);
    assert_eq!(
        config.durascan.exclude_folders,
        Some(vec![String::from("snapshots")])
    );
}

#[test]
fn test_load_from_file_path() {
    let dir = TempDir::new().unwrap();
    let mut file = std::fs::File::create(dir.path().join(".durascan.toml")).unwrap();
    writeln!(
        file,
        r#"[durascan]
include_tests = true
"#
    )
    .unwrap();

    let py_file = dir.path().join("function_app.py");
    std::fs::write(&py_file, "x = 1").unwrap();

    let config = Config::load_from_path(&py_file);
    assert_eq!(config.durascan.include_tests, Some(true));
}

#[test]
fn test_kebab_case_aliases() {
    let content = r#"
[durascan]
per-file-ignores = { "tests/*" = ["DS-N101"] }
min-severity = "high"
"#;
    let config = toml::from_str::<Config>(content).unwrap();
    assert_eq!(config.durascan.min_severity.as_deref(), Some("high"));
    let per_file = config.durascan.per_file_ignores.unwrap();
    assert_eq!(
        per_file.get("tests/*"),
        Some(&vec![String::from("DS-N101")])
    );
}
