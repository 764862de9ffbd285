//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `fsport`.
#[derive(Debug, Parser)]
#[command(name = "fsport", version, about = "Inspect file-system mock scripts and call logs")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load an expectation script and list what it programs.
    Lint {
        /// Path to the YAML expectation script.
        script: PathBuf,
    },
    /// Print a call log written by a mock.
    Log {
        /// Path to the `.calls.yaml` file.
        file: PathBuf,
        /// Only show calls that matched no expectation.
        #[arg(long)]
        unexpected: bool,
        /// Print the log as JSON instead of one line per call.
        #[arg(long)]
        json: bool,
    },
}
