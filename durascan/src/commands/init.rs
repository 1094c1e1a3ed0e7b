use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default configuration for a standalone `.durascan.toml`.
const DEFAULT_CONFIG: &str = r#"
[durascan]
# Core settings
include_tests = false      # Include test files in analysis
min_severity = "low"       # Report floor: low, medium, high, or critical
fail_on_findings = false   # Exit 1 when any finding is reported

# Rule tuning
ignore = []                # Rule IDs suppressed everywhere, e.g. ["DS-N103"]
deterministic_decorators = ["deterministic"]  # Decorators that opt helpers into checking

# Path filters
exclude_folders = ["build", "dist", ".venv", ".git", "__pycache__", ".mypy_cache", ".pytest_cache"]
include_folders = ["src"]  # Force-include these folders even if ignored by git

# Per-file rule ignores (glob -> rule IDs)
# per-file-ignores = { "tests/*" = ["DS-N101"], "samples/*" = ["DS-A301"] }
"#;

pub const DEFAULT_PYPROJECT_CONFIG: &str = r#"
[tool.durascan]
# Core settings
include_tests = false      # Include test files in analysis
min_severity = "low"       # Report floor: low, medium, high, or critical
fail_on_findings = false   # Exit 1 when any finding is reported

# Rule tuning
ignore = []                # Rule IDs suppressed everywhere, e.g. ["DS-N103"]
deterministic_decorators = ["deterministic"]  # Decorators that opt helpers into checking

# Path filters
exclude_folders = ["build", "dist", ".venv", ".git", "__pycache__", ".mypy_cache", ".pytest_cache"]
include_folders = ["src"]  # Force-include these folders even if ignored by git
"#;

/// Run the init command to initialize DuraScan configuration in the
/// current directory.
pub fn run_init<W: Write>(writer: &mut W) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    run_init_in(&current_dir, writer)
}

/// Run the init command against an explicit project root.
pub fn run_init_in<W: Write>(root: &Path, writer: &mut W) -> Result<()> {
    writeln!(writer, "Initializing DuraScan configuration...")?;

    handle_config_file(root, writer)?;
    handle_gitignore(root, writer)?;

    writeln!(writer, "Initialization complete!")?;
    Ok(())
}

fn handle_config_file<W: Write>(root: &Path, writer: &mut W) -> Result<()> {
    let pyproject_path = root.join("pyproject.toml");
    let durascan_toml_path = root.join(".durascan.toml");

    if pyproject_path.exists() {
        // Check if [tool.durascan] already exists
        let content = fs::read_to_string(&pyproject_path)?;
        if content.contains("[tool.durascan]") {
            writeln!(
                writer,
                "  • pyproject.toml already contains [tool.durascan] - skipping."
            )?;
        } else {
            let mut file = fs::OpenOptions::new().append(true).open(&pyproject_path)?;

            // Add a newline before appending if the file doesn't end with one
            if !content.ends_with('\n') {
                writeln!(file)?;
            }

            writeln!(file, "\n{}", DEFAULT_PYPROJECT_CONFIG.trim())?;
            writeln!(writer, "  • Added default configuration to pyproject.toml.")?;
        }
    } else if durascan_toml_path.exists() {
        writeln!(writer, "  • .durascan.toml already exists - skipping.")?;
    } else {
        // Create .durascan.toml
        let mut file = fs::File::create(&durascan_toml_path)?;
        writeln!(file, "{}", DEFAULT_CONFIG.trim())?;
        writeln!(
            writer,
            "  • Created .durascan.toml with default configuration."
        )?;
    }

    Ok(())
}

fn handle_gitignore<W: Write>(root: &Path, writer: &mut W) -> Result<()> {
    let gitignore_path = root.join(".gitignore");
    let ignore_entry = ".durascan";

    if gitignore_path.exists() {
        let content = fs::read_to_string(&gitignore_path)?;
        // Simple check if the entry exists
        // Note: This isn't a robust .gitignore parser, but sufficient for simple cases
        if content.contains(ignore_entry) {
            writeln!(
                writer,
                "  • .gitignore already contains {ignore_entry} - skipping."
            )?;
        } else {
            let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;

            // Add a newline before appending if the file doesn't end with one
            if !content.ends_with('\n') && !content.is_empty() {
                writeln!(file)?;
            }

            writeln!(file, "{ignore_entry}")?;
            writeln!(writer, "  • Added {ignore_entry} to .gitignore.")?;
        }
    } else {
        let mut file = fs::File::create(&gitignore_path)?;
        writeln!(file, "{ignore_entry}")?;
        writeln!(writer, "  • Created .gitignore with {ignore_entry}.")?;
    }

    Ok(())
}
