use crate::analyzer::AnalysisResult;
use crate::utils::normalize_display_path;
use std::io::Write;
use std::path::Path;

/// Generates GitHub Actions workflow commands (`::error`, `::warning`,
/// `::notice`) so findings surface as inline annotations on pull requests.
///
/// See: https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_github_with_root(
    writer: &mut impl Write,
    result: &AnalysisResult,
    root: Option<&Path>,
) -> std::io::Result<()> {
    for finding in &result.findings {
        let command = match finding.severity.to_uppercase().as_str() {
            "CRITICAL" | "HIGH" => "error",
            "MEDIUM" => "warning",
            _ => "notice",
        };
        writeln!(
            writer,
            "::{} file={},line={},col={},title={}::{}",
            command,
            display_path(&finding.file, root),
            finding.line,
            finding.col,
            finding.rule_id,
            escape_message(&finding.message)
        )?;
    }

    for error in &result.parse_errors {
        writeln!(
            writer,
            "::error file={},line={}::Parse error: {}",
            display_path(&error.file, root),
            error.line.max(1),
            escape_message(&error.message)
        )?;
    }

    Ok(())
}

fn display_path(file: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|root| file.strip_prefix(root).ok())
        .unwrap_or(file);
    normalize_display_path(relative)
}

/// Workflow-command data must keep `%` and newlines out of the raw stream.
fn escape_message(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::analyzer::{AnalysisSummary, ParseError};
    use crate::rules::Finding;
    use std::path::PathBuf;

    fn finding(severity: &str) -> Finding {
        Finding {
            rule_id: "DS-N101".to_string(),
            severity: severity.to_string(),
            category: "Determinism".to_string(),
            message: "'datetime.now()' is not replay-safe".to_string(),
            file: PathBuf::from("/proj/app.py"),
            line: 4,
            col: 12,
            fix: None,
        }
    }

    fn render(result: &AnalysisResult, root: Option<&Path>) -> String {
        let mut buffer = Vec::new();
        print_github_with_root(&mut buffer, result, root).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn severity_maps_to_workflow_command() {
        let result = AnalysisResult {
            findings: vec![finding("HIGH"), finding("MEDIUM"), finding("LOW")],
            functions: Vec::new(),
            parse_errors: Vec::new(),
            analysis_summary: AnalysisSummary::default(),
        };

        let out = render(&result, Some(Path::new("/proj")));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("::error file=app.py,line=4,col=12,title=DS-N101::"));
        assert!(lines[1].starts_with("::warning file=app.py,"));
        assert!(lines[2].starts_with("::notice file=app.py,"));
    }

    #[test]
    fn parse_errors_annotate_line_one_at_minimum() {
        let result = AnalysisResult {
            findings: Vec::new(),
            functions: Vec::new(),
            parse_errors: vec![ParseError {
                file: PathBuf::from("/proj/bad.py"),
                line: 0,
                message: "unexpected token".to_string(),
            }],
            analysis_summary: AnalysisSummary::default(),
        };

        let out = render(&result, Some(Path::new("/proj")));
        assert_eq!(
            out.trim_end(),
            "::error file=bad.py,line=1::Parse error: unexpected token"
        );
    }

    #[test]
    fn messages_escape_percent_and_newlines() {
        let mut bad = finding("HIGH");
        bad.message = "100% broken\nsecond line".to_string();
        let result = AnalysisResult {
            findings: vec![bad],
            functions: Vec::new(),
            parse_errors: Vec::new(),
            analysis_summary: AnalysisSummary::default(),
        };

        let out = render(&result, None);
        assert!(out.contains("100%25 broken%0Asecond line"));
    }
}
