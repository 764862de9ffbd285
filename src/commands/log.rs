//! `fsport log` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::call_log::{CallLog, CallRecord};

/// Execute the `log` command.
///
/// # Errors
///
/// Returns an error string if the call log cannot be loaded.
pub fn run(path: &Path, unexpected_only: bool, json: bool) -> Result<(), String> {
    let out =
        if json { render_json(path, unexpected_only)? } else { render(path, unexpected_only)? };
    print!("{out}");
    Ok(())
}

/// Load the call log at `path` and format it as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error string if the call log cannot be loaded or serialized.
pub fn render_json(path: &Path, unexpected_only: bool) -> Result<String, String> {
    let mut log = CallLog::load(path).map_err(|e| e.to_string())?;
    if unexpected_only {
        log.calls.retain(CallRecord::is_unexpected);
    }
    let json = serde_json::to_string_pretty(&log)
        .map_err(|e| format!("Failed to serialize call log: {e}"))?;
    Ok(format!("{json}\n"))
}

/// Load the call log at `path` and format one line per call.
///
/// # Errors
///
/// Returns an error string if the call log cannot be loaded.
pub fn render(path: &Path, unexpected_only: bool) -> Result<String, String> {
    let log = CallLog::load(path).map_err(|e| e.to_string())?;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} call(s), {} unexpected)",
        log.name.as_deref().unwrap_or(&log.session),
        log.calls.len(),
        log.unexpected().count()
    );
    for call in log.calls.iter().filter(|c| !unexpected_only || c.is_unexpected()) {
        let matched =
            call.expectation.map_or_else(|| "UNEXPECTED".to_string(), |i| format!("#{i}"));
        let _ = writeln!(
            out,
            "  {:>4} {} {}({:?}) -> {}",
            call.seq,
            call.at.format("%H:%M:%S%.3f"),
            call.operation,
            call.path,
            matched
        );
    }
    Ok(out)
}
