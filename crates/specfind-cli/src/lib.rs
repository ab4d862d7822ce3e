//! Command-line front end for `specfind-core`.
//!
//! The binary in `main.rs` only calls [`run`] and maps the returned error to
//! an exit code with [`error::exit_code_from_error`].

pub mod args;
mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use anyhow::Result;
use clap::Parser;

use crate::args::Verbosity;
use crate::cli::{Cli, Commands};
use crate::utils::logging::initialize_logging;

/// Parse arguments, set up logging and execute the selected command.
///
/// # Errors
///
/// Returns the command's error, categorized through [`error::CliError`]
/// where the failure class is known.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose, cli.debug);
    let (config, config_path) = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Discover(args) => commands::discover(&args, config, verbosity).await,
        Commands::Candidates(args) => {
            commands::show_candidates(&args.url, &args.output, &config)
        },
        Commands::Config { path } => commands::show_config(&config, &config_path, path),
    }
}
