use anyhow::Result;

use super::context::AnalysisContext;
use super::run::AnalysisRun;

/// Applies the CI gate: a non-zero exit when findings remain and
/// `--fail-on-findings` (or the config equivalent) is set. Parse errors on
/// their own never fail the gate; they surface in the report instead.
pub(crate) fn apply_gates<W: std::io::Write>(
    context: &AnalysisContext,
    run: &AnalysisRun,
    writer: &mut W,
) -> Result<i32> {
    let result = &run.result;
    let mut exit_code = 0;

    if context.fail_on_findings {
        let count = result.findings.len();
        if count > 0 {
            if !context.is_structured {
                eprintln!("\n[GATE] Replay-safety findings: {count} - FAILED");
            }
            exit_code = 1;
        } else if !context.is_structured {
            writeln!(writer, "\n[GATE] Replay-safety findings: 0 - PASSED")?;
        }
    }

    Ok(exit_code)
}
