//! Binary entrypoint for the `fsport` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    fsport::logging::init();
    match fsport::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
