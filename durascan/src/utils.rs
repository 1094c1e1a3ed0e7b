use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, SUPPRESSION_RE, TEST_FILE_RE};
use ruff_text_size::TextSize;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

/// A utility struct to convert byte offsets to line numbers.
///
/// The AST parser works with byte offsets, but findings are reported with
/// line numbers which are more human-readable.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration for performance since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a `TextSize` to a 1-indexed column on its line.
    #[must_use]
    pub fn column_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        };
        offset - self.line_starts[line - 1] + 1
    }
}

/// Per-line suppression directives parsed from `# pragma: no durascan` comments.
///
/// A bare pragma suppresses every rule on its line; a bracketed list such as
/// `# pragma: no durascan[DS-N101]` suppresses only the listed rule IDs.
#[derive(Debug, Default, Clone)]
pub struct SuppressedLines {
    // None = blanket suppression, Some(ids) = only those rules.
    by_line: FxHashMap<usize, Option<FxHashSet<String>>>,
}

impl SuppressedLines {
    /// Scans source for suppression pragmas and records them per line (1-indexed).
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        let mut by_line = FxHashMap::default();
        for (i, line) in source.lines().enumerate() {
            let Some(captures) = SUPPRESSION_RE().captures(line) else {
                continue;
            };
            let entry = captures.get(1).map(|rule_list| {
                rule_list
                    .as_str()
                    .split(',')
                    .map(|id| id.trim().to_uppercase())
                    .filter(|id| !id.is_empty())
                    .collect::<FxHashSet<String>>()
            });
            by_line.insert(i + 1, entry);
        }
        Self { by_line }
    }

    /// Returns whether `rule_id` is suppressed on the given 1-indexed line.
    #[must_use]
    pub fn is_suppressed(&self, line: usize, rule_id: &str) -> bool {
        match self.by_line.get(&line) {
            Some(None) => true,
            Some(Some(ids)) => ids.contains(&rule_id.to_uppercase()),
            None => false,
        }
    }

    /// Returns whether the source contains no pragmas at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }
}

/// Checks if a path is a test path.
#[must_use]
pub fn is_test_path(p: &str) -> bool {
    TEST_FILE_RE().is_match(p)
}

/// Parses exclude folders, combining defaults with user inputs.
pub fn parse_exclude_folders(
    user_exclude_folders: &[String],
    use_defaults: bool,
    include_folders: &[String],
) -> FxHashSet<String> {
    let mut exclude_folders = FxHashSet::default();

    if use_defaults {
        for folder in DEFAULT_EXCLUDE_FOLDERS() {
            exclude_folders.insert((*folder).to_owned());
        }
    }

    exclude_folders.extend(user_exclude_folders.iter().cloned());

    for folder in include_folders {
        exclude_folders.remove(folder);
    }

    exclude_folders
}

/// Collects Python source files under `root`, honoring gitignore rules and
/// the exclude/include folder lists. Returns the files plus the number of
/// directories visited.
#[must_use]
pub fn collect_python_files(
    root: &Path,
    exclude_folders: &[String],
    include_folders: &[String],
    verbose: bool,
) -> (Vec<PathBuf>, usize) {
    if root.is_file() {
        return (vec![root.to_path_buf()], 0);
    }

    let excludes = parse_exclude_folders(exclude_folders, true, include_folders);
    let mut files = Vec::new();
    let mut directories = 0;

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        .hidden(false)
        .filter_entry(move |entry| {
            if entry.file_type().is_some_and(|t| t.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                return !excludes.contains(name.as_ref());
            }
            true
        })
        .build();

    for entry in walker {
        let Ok(entry) = entry else { continue };
        if entry.file_type().is_some_and(|t| t.is_dir()) {
            directories += 1;
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "py") {
            if verbose {
                eprintln!("[VERBOSE] Found: {}", path.display());
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    (files, directories)
}

/// Derives a dotted module name from a file path relative to the analysis root.
///
/// `functions/orchestrators/billing.py` becomes `functions.orchestrators.billing`;
/// a trailing `__init__` segment is dropped.
#[must_use]
pub fn module_name_from_path(file_path: &Path, root_path: &Path) -> String {
    let relative = file_path.strip_prefix(root_path).unwrap_or(file_path);
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = last.strip_suffix(".py") {
            *last = stem.to_owned();
        }
    }
    if segments.last().is_some_and(|s| s == "__init__") {
        segments.pop();
    }

    segments.join(".")
}

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use durascan::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\functions\\app.py")), "functions/app.py");
/// assert_eq!(normalize_display_path(Path::new("./src/main.py")), "src/main.py");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Validates that a write target does not escape the analysis root via
/// traversal. The longest existing ancestor is canonicalized to resolve
/// symlinks; the non-existent remainder must not contain `..` components.
///
/// # Errors
///
/// Returns an error if the containment root cannot be resolved, or if the
/// path points outside of it.
pub fn validate_output_path(path: &Path, root: Option<&Path>) -> anyhow::Result<PathBuf> {
    let containment_root = match root {
        Some(r) => r.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let canonical_root = containment_root.canonicalize().map_err(|e| {
        anyhow::anyhow!(
            "Failed to canonicalize root {}: {}",
            containment_root.display(),
            e
        )
    })?;

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        containment_root.join(path)
    };

    // Find the longest existing ancestor so symlinks can be resolved even
    // when the target file does not exist yet.
    let mut ancestor = absolute_path.as_path();
    while !ancestor.exists() {
        match ancestor.parent() {
            Some(p) => ancestor = p,
            None => break,
        }
    }

    let canonical_ancestor = ancestor.canonicalize().map_err(|e| {
        anyhow::anyhow!(
            "Failed to canonicalize ancestor path {}: {}",
            ancestor.display(),
            e
        )
    })?;

    if !canonical_ancestor.starts_with(&canonical_root) {
        anyhow::bail!(
            "Path traversal detected: {} is outside of {}",
            path.display(),
            containment_root.display()
        );
    }

    if let Ok(remainder) = absolute_path.strip_prefix(ancestor) {
        for component in remainder.components() {
            if let std::path::Component::ParentDir = component {
                anyhow::bail!(
                    "Path contains '..' in non-existent portion: '{}'",
                    path.display()
                );
            }
        }
    }

    Ok(absolute_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_line_index_maps_offsets_to_lines() {
        let index = LineIndex::new("a\nbb\nccc\n");
        assert_eq!(index.line_index(TextSize::new(0)), 1);
        assert_eq!(index.line_index(TextSize::new(2)), 2);
        assert_eq!(index.line_index(TextSize::new(3)), 2);
        assert_eq!(index.line_index(TextSize::new(5)), 3);
        assert_eq!(index.column_index(TextSize::new(6)), 2);
    }

    #[test]
    fn test_suppression_blanket_and_scoped() {
        let source = "x = 1  # pragma: no durascan\ny = 2  # pragma: no durascan[DS-N101, ds-n104]\nz = 3\n";
        let suppressed = SuppressedLines::from_source(source);
        assert!(suppressed.is_suppressed(1, "DS-N101"));
        assert!(suppressed.is_suppressed(1, "DS-B201"));
        assert!(suppressed.is_suppressed(2, "DS-N101"));
        assert!(suppressed.is_suppressed(2, "DS-N104"));
        assert!(!suppressed.is_suppressed(2, "DS-N105"));
        assert!(!suppressed.is_suppressed(3, "DS-N101"));
    }

    #[test]
    fn test_module_name_from_path() {
        let root = Path::new("/project");
        assert_eq!(
            module_name_from_path(Path::new("/project/functions/billing.py"), root),
            "functions.billing"
        );
        assert_eq!(
            module_name_from_path(Path::new("/project/pkg/__init__.py"), root),
            "pkg"
        );
    }

    #[test]
    fn test_parse_exclude_folders_include_overrides() {
        let excludes = parse_exclude_folders(&["custom".to_owned()], true, &["build".to_owned()]);
        assert!(excludes.contains("custom"));
        assert!(excludes.contains("venv"));
        assert!(!excludes.contains("build"));
    }

    #[test]
    fn test_collect_python_files_skips_excluded_dirs() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("venv"))?;
        fs::write(dir.path().join("venv").join("skip.py"), "x = 1\n")?;
        fs::write(dir.path().join("app.py"), "x = 1\n")?;
        fs::write(dir.path().join("notes.txt"), "not python\n")?;

        let (files, _) = collect_python_files(dir.path(), &[], &[], false);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.py"));
        Ok(())
    }

    #[test]
    fn test_validate_output_path_blocks_traversal() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("project");
        fs::create_dir(&root)?;

        assert!(validate_output_path(Path::new("report.json"), Some(&root)).is_ok());
        assert!(validate_output_path(Path::new("../escape.py"), Some(&root)).is_err());
        Ok(())
    }
}
