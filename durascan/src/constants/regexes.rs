use regex::Regex;
use std::sync::OnceLock;

/// Returns the compiled suppression-comment regex.
///
/// Matches `# pragma: no durascan` with an optional bracketed rule list,
/// e.g. `# pragma: no durascan[DS-N101, DS-N104]`.
pub fn get_suppression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?i)#\s*pragma:\s*no\s*durascan(?:\s*\[([^\]]*)\])?")
            .expect("Invalid suppression regex pattern")
    })
}

/// Returns the compiled regex for test-file path detection.
pub fn get_test_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(
            r"(?:^|[/\\])tests?[/\\]|(?:^|[/\\])test_[^/\\]+\.py$|[^/\\]+_test\.py$|conftest\.py$",
        )
        .expect("Invalid test file regex pattern")
    })
}
