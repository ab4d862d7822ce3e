//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::args::Verbosity;
use crate::cli::Cli;

/// Initialize the tracing subscriber from the global flags.
///
/// Machine-readable output drops the level to `ERROR` unless verbose or
/// debug output was asked for, keeping stderr quiet for scripts.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose, cli.debug);
    let machine_output = cli
        .output_format()
        .is_some_and(crate::args::OutputFormat::is_machine_readable);

    let level = if machine_output && !verbosity.is_verbose() {
        Level::ERROR
    } else {
        verbosity.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}
