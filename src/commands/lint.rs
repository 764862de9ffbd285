//! `fsport lint` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::script::ExpectationScript;

/// Execute the `lint` command.
///
/// # Errors
///
/// Returns an error string if the script cannot be loaded or has an
/// inconsistent entry.
pub fn run(path: &Path) -> Result<(), String> {
    print!("{}", render(path)?);
    Ok(())
}

/// Load the script at `path`, program a throwaway mock with it and
/// describe each expectation.
///
/// # Errors
///
/// Returns an error string if the script cannot be loaded or has an
/// inconsistent entry.
pub fn render(path: &Path) -> Result<String, String> {
    let script = ExpectationScript::load(path).map_err(|e| e.to_string())?;
    let (mock, _writers) = script.build_mock().map_err(|e| e.to_string())?;
    let summaries = mock.expectations();
    // Discard the expectations so dropping the mock does not fail.
    let _ = mock.checkpoint();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({:?}): {} expectation(s)",
        script.name,
        script.strictness,
        summaries.len()
    );
    for summary in &summaries {
        let _ = writeln!(
            out,
            "  {}#{} {} {} -> {}",
            summary.operation,
            summary.index,
            summary.matcher,
            summary.times,
            summary.returns.unwrap_or("nothing"),
        );
    }
    Ok(out)
}
