//! # CLI Structure and Argument Parsing
//!
//! `specfind` takes whatever URL a user has at hand, usually an API
//! documentation page, and finds the OpenAPI/Swagger document behind it.
//!
//! ```bash
//! # Find the spec behind a docs page
//! specfind discover https://api.example.com/docs
//!
//! # Machine-readable result, spec saved to disk
//! specfind discover https://api.example.com/docs --json --save openapi.json
//!
//! # Show what would be probed, without touching the network
//! specfind candidates https://api.example.com/docs
//!
//! # Effective configuration
//! specfind config
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::args::OutputArgs;

/// Main CLI structure for the `specfind` command
#[derive(Parser, Clone, Debug)]
#[command(name = "specfind")]
#[command(version)]
#[command(about = "Find the OpenAPI/Swagger document behind any API docs URL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show debug diagnostics
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the configuration file (overrides `SPECFIND_CONFIG`)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Locate the API description behind a URL
    Discover(DiscoverArgs),

    /// Print the candidate URLs that would be probed, grouped by tier
    Candidates(CandidatesArgs),

    /// Print the effective configuration
    Config {
        /// Print only the configuration file location
        #[arg(long)]
        path: bool,
    },
}

/// Arguments for `specfind discover`
#[derive(Args, Clone, Debug)]
pub struct DiscoverArgs {
    /// Documentation page or spec URL (scheme optional)
    pub url: String,

    /// Base URL of a CORS relay exposing `/proxy-fetch?url=`
    #[arg(long, value_name = "URL")]
    pub relay: Option<String>,

    /// Per-candidate timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Relay request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub relay_timeout_ms: Option<u64>,

    /// Give up after this many milliseconds overall
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Concurrent probes in the batched tiers
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..=32))]
    pub batch_width: Option<u16>,

    /// Write the discovered document to this file, pretty-printed
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for `specfind candidates`
#[derive(Args, Clone, Debug)]
pub struct CandidatesArgs {
    /// Documentation page or spec URL (scheme optional)
    pub url: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl Cli {
    /// Output format the selected command will print in, if any.
    pub fn output_format(&self) -> Option<crate::args::OutputFormat> {
        match &self.command {
            Commands::Discover(args) => Some(args.output.resolve()),
            Commands::Candidates(args) => Some(args.output.resolve()),
            Commands::Config { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::args::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_discover_flags() {
        let cli = Cli::try_parse_from([
            "specfind",
            "discover",
            "api.example.com/docs",
            "--relay",
            "http://localhost:3001/api",
            "--timeout-ms",
            "1500",
            "--batch-width",
            "8",
            "--json",
        ])
        .unwrap();

        let Commands::Discover(args) = &cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.url, "api.example.com/docs");
        assert_eq!(args.relay.as_deref(), Some("http://localhost:3001/api"));
        assert_eq!(args.timeout_ms, Some(1500));
        assert_eq!(args.batch_width, Some(8));
        assert_eq!(cli.output_format(), Some(OutputFormat::Json));
    }

    #[test]
    fn test_batch_width_is_bounded() {
        let result = Cli::try_parse_from(["specfind", "discover", "x.com", "--batch-width", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["specfind", "config", "--path", "--quiet"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Config { path: true }));
        assert_eq!(cli.output_format(), None);
    }
}
