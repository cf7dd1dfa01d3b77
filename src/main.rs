//! promptlab CLI entry point.
//!
//! Parses arguments, dispatches to the command handler, and maps errors to
//! exit codes.

mod cli;
mod commands;

use cli::Cli;
use promptlab::{exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    dotenvy::dotenv().ok();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
