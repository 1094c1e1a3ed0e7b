//! Discovery pass: parse one file and extract its durable registrations.

use ruff_python_ast::ModModule;
use ruff_python_parser::parse_module;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyzer::types::ParseError;
use crate::analyzer::DuraScan;
use crate::durable::{discover_module, ImportMap, ModuleDiscovery};
use crate::utils::{module_name_from_path, LineIndex, SuppressedLines};

/// Everything the lint pass needs about one successfully parsed file.
#[derive(Debug)]
pub(crate) struct FileDiscovery {
    pub(crate) file: Arc<PathBuf>,
    pub(crate) source: String,
    pub(crate) module: ModModule,
    pub(crate) imports: ImportMap,
    pub(crate) discovery: ModuleDiscovery,
    pub(crate) suppressed: SuppressedLines,
    pub(crate) line_count: usize,
}

impl DuraScan {
    /// Reads and parses one file from disk, returning its discovery record.
    pub(crate) fn discover_single_file(&self, file: &Path) -> Result<FileDiscovery, ParseError> {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                self.bump_progress();
                return Err(ParseError {
                    file: file.to_path_buf(),
                    line: 0,
                    message: format!("Failed to read file: {err}"),
                });
            }
        };
        let module_name = module_name_from_path(file, &self.analysis_root);
        let result = self.discover_source(file, source, &module_name);
        self.bump_progress();
        result
    }

    /// Parses an in-memory buffer and runs registration discovery over it.
    pub(crate) fn discover_source(
        &self,
        file: &Path,
        source: String,
        module_name: &str,
    ) -> Result<FileDiscovery, ParseError> {
        let module = match parse_module(&source) {
            Ok(parsed) => parsed.into_syntax(),
            Err(err) => {
                let line = LineIndex::new(&source).line_index(err.location.start());
                return Err(ParseError {
                    file: file.to_path_buf(),
                    line,
                    message: err.to_string(),
                });
            }
        };

        let file = Arc::new(file.to_path_buf());
        let imports = ImportMap::build(&module, &source);
        let discovery = discover_module(
            &module,
            &source,
            &file,
            module_name,
            &imports,
            &self.config,
        );
        let suppressed = SuppressedLines::from_source(&source);
        let line_count = source.lines().count();

        Ok(FileDiscovery {
            file,
            source,
            module,
            imports,
            discovery,
            suppressed,
            line_count,
        })
    }

    pub(crate) fn bump_progress(&self) {
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.inc(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_source_records_registrations() {
        let analyzer = DuraScan::default();
        let code = r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    pass
"#;
        let fd = analyzer
            .discover_source(Path::new("flows.py"), code.to_string(), "flows")
            .expect("fixture should parse");
        assert_eq!(fd.discovery.module, "flows");
        assert_eq!(fd.discovery.functions.len(), 1);
        assert_eq!(fd.line_count, 4);
        assert!(fd.suppressed.is_empty());
    }

    #[test]
    fn test_discover_source_reports_syntax_errors_with_line() {
        let analyzer = DuraScan::default();
        let code = "def broken(:\n    pass\n";
        let err = analyzer
            .discover_source(Path::new("broken.py"), code.to_string(), "broken")
            .expect_err("fixture should not parse");
        assert_eq!(err.file, Path::new("broken.py"));
        assert_eq!(err.line, 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_discover_single_file_missing_file_is_an_error() {
        let analyzer = DuraScan::default();
        let err = analyzer
            .discover_single_file(Path::new("/nonexistent/app.py"))
            .expect_err("missing file");
        assert_eq!(err.line, 0);
        assert!(err.message.contains("Failed to read file"));
    }
}
