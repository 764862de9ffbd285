//! File-system port with an expectation-driven test double.
//!
//! Production code depends on [`ports::FileSystem`]; tests inject a
//! [`mock::MockFileSystem`] programmed with the calls they expect.

pub mod call_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod mock;
pub mod ports;
pub mod script;

pub use mock::MockFileSystem;
pub use ports::FileSystem;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
