//! CLI binary for `staffdesk`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to
//! the library.

use clap::Parser;
use staffdesk::cli::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
