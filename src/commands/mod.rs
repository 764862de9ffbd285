//! Command dispatch and handlers.

pub mod lint;
pub mod log;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Lint { script } => lint::run(script),
        Command::Log { file, unexpected, json } => log::run(file, *unexpected, *json),
    }
}
