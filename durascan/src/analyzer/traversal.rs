//! Two-phase parallel analysis over a set of files and directories.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::single_file::{FileDiscovery, LintOutput};
use super::types::{AnalysisResult, ParseError};
use super::DuraScan;
use crate::constants::CHUNK_SIZE;
use crate::durable::FunctionIndex;
use crate::utils::collect_python_files;

impl DuraScan {
    /// Analyzes every Python file under `root`.
    pub fn analyze(&mut self, root: &Path) -> AnalysisResult {
        self.analyze_paths(&[root.to_path_buf()])
    }

    /// Analyzes an explicit set of files and directories.
    ///
    /// Discovery parses everything first so that activity lookups and the
    /// replay-scope closure see the whole project; linting then runs against
    /// the completed index.
    pub fn analyze_paths(&mut self, paths: &[PathBuf]) -> AnalysisResult {
        let start = Instant::now();

        let mut files = Vec::new();
        let mut total_directories = 0;
        for path in paths {
            let (mut collected, directories) = collect_python_files(
                path,
                &self.exclude_folders,
                &self.include_folders,
                self.verbose,
            );
            total_directories += directories;
            files.append(&mut collected);
        }
        files.sort();
        files.dedup();
        files.retain(|file| self.should_lint(file));
        self.total_files_analyzed = files.len();

        // Phase 1: parse every file and discover durable registrations.
        let discovered: Vec<Result<FileDiscovery, ParseError>> = files
            .par_chunks(CHUNK_SIZE)
            .flat_map_iter(|chunk| chunk.iter().map(|file| self.discover_single_file(file)))
            .collect();

        let mut parse_errors = Vec::new();
        let mut file_discoveries = Vec::new();
        for result in discovered {
            match result {
                Ok(discovery) => file_discoveries.push(discovery),
                Err(error) => parse_errors.push(error),
            }
        }

        let index = FunctionIndex::build(file_discoveries.iter().map(|fd| &fd.discovery));

        // Phase 2: lint each kept AST against the index.
        let outputs: Vec<LintOutput> = file_discoveries
            .par_chunks(CHUNK_SIZE)
            .flat_map_iter(|chunk| chunk.iter().map(|fd| self.lint_single_file(fd, &index)))
            .collect();

        self.aggregate_results(
            outputs,
            &index,
            parse_errors,
            total_directories,
            start.elapsed().as_secs_f64(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture");
    }

    #[test]
    fn test_analyze_spans_files_for_activity_lookup() {
        let dir = tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "orchestrators.py",
            r#"
@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    yield ctx.call_activity("crunch", 41)
    yield ctx.call_activity("missing", 1)
"#,
        );
        write_file(
            dir.path(),
            "activities.py",
            r#"
@app.activity_trigger(input_name="value")
def crunch(value: int):
    return value + 1
"#,
        );

        let mut analyzer = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
        let result = analyzer.analyze(dir.path());

        assert_eq!(result.analysis_summary.total_files, 2);
        assert_eq!(result.analysis_summary.orchestrators_count, 1);
        assert_eq!(result.analysis_summary.activities_count, 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].rule_id, "DS-A301");
        assert!(result.findings[0].message.contains("missing"));
    }

    #[test]
    fn test_transitive_calls_materialize_after_the_index_is_built() {
        let dir = tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "app.py",
            r#"
import datetime

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    stamp()

def stamp():
    return datetime.datetime.now()
"#,
        );

        let mut analyzer = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
        let result = analyzer.analyze(dir.path());

        let ids: Vec<&str> = result
            .findings
            .iter()
            .map(|f| f.rule_id.as_str())
            .collect();
        // The call site gets the transitive finding and the helper body keeps
        // its direct one.
        assert_eq!(ids, vec!["DS-N107", "DS-N101"]);
        assert_eq!(result.findings[0].line, 6);
        assert_eq!(result.findings[1].line, 9);
    }

    #[test]
    fn test_parse_errors_are_collected_not_fatal() {
        let dir = tempdir().expect("tempdir");
        write_file(dir.path(), "good.py", "x = 1\n");
        write_file(dir.path(), "bad.py", "def broken(:\n");

        let mut analyzer = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
        let result = analyzer.analyze(dir.path());

        assert_eq!(result.analysis_summary.total_files, 2);
        assert_eq!(result.parse_errors.len(), 1);
        assert!(result.parse_errors[0].file.ends_with("bad.py"));
        assert_eq!(result.analysis_summary.parse_errors_count, 1);
    }

    #[test]
    fn test_test_files_are_skipped_unless_included() {
        let dir = tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "test_flows.py",
            r#"
import datetime

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    return datetime.datetime.now()
"#,
        );

        let mut skipping = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
        let skipped = skipping.analyze(dir.path());
        assert_eq!(skipped.analysis_summary.total_files, 0);
        assert!(skipped.findings.is_empty());

        let mut including = DuraScan::new(true, None, None).with_root(dir.path().to_path_buf());
        let included = including.analyze(dir.path());
        assert_eq!(included.analysis_summary.total_files, 1);
        assert_eq!(included.findings.len(), 1);
    }

    #[test]
    fn test_marked_callee_suppresses_the_call_site_only() {
        let dir = tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "app.py",
            r#"
import datetime

@app.orchestration_trigger(context_name="ctx")
def flow(ctx):
    not_actually_pure()

@deterministic
def not_actually_pure():
    return datetime.datetime.now()
"#,
        );

        let mut analyzer = DuraScan::new(false, None, None).with_root(dir.path().to_path_buf());
        let result = analyzer.analyze(dir.path());

        let ids: Vec<&str> = result
            .findings
            .iter()
            .map(|f| f.rule_id.as_str())
            .collect();
        // No DS-N107 at the call site, but the marked function's own body is
        // still linted.
        assert_eq!(ids, vec!["DS-N101"]);
        assert_eq!(result.findings[0].line, 10);
    }
}
