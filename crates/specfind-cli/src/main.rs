//! specfind CLI - locate the OpenAPI/Swagger document behind a URL
//!
//! Command implementations live in the library crate; this entry point
//! only maps failures to semantic exit codes.

use colored::Colorize;
use specfind_cli::error::exit_code_from_error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match specfind_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
