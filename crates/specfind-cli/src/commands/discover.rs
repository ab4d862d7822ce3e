//! `specfind discover`: locate the API description behind a URL

use anyhow::{Context, Result, anyhow};
use is_terminal::IsTerminal;
use specfind_core::{Config, DiscoveryResult, SpecDiscovery, VisitTracker};
use std::time::Duration;
use tracing::{debug, info};

use crate::args::{OutputFormat, Verbosity};
use crate::cli::DiscoverArgs;
use crate::error::{CliError, ErrorCategory};
use crate::output::{DiscoverySpinner, JsonFormatter, TextFormatter};

const TRACKING_TIMEOUT: Duration = Duration::from_secs(5);

/// Run discovery for `args.url` and print the outcome.
///
/// A failed discovery still prints its JSON body when JSON was requested,
/// then surfaces as a [`CliError`] so the exit code reflects the failure.
pub async fn execute(args: &DiscoverArgs, mut config: Config, verbosity: Verbosity) -> Result<()> {
    apply_overrides(&mut config, args);
    let discovery = SpecDiscovery::new(config.to_options()).map_err(CliError::from_core)?;

    if let Some(endpoint) = &config.tracking.endpoint {
        record_visit(endpoint).await;
    }

    let format = args.output.resolve();
    let spinner = (format == OutputFormat::Text
        && !args.no_progress
        && !verbosity.is_quiet()
        && std::io::stderr().is_terminal())
    .then(|| DiscoverySpinner::start(&args.url));

    let result = match &spinner {
        Some(spinner) => {
            discovery
                .discover_with_progress(&args.url, spinner.callback())
                .await
        },
        None => discovery.discover(&args.url).await,
    };
    if let Some(spinner) = spinner {
        spinner.finish();
    }

    if let (Some(path), Some(data)) = (&args.save, result.data()) {
        let body = serde_json::to_string_pretty(data)?;
        std::fs::write(path, body + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Saved API description");
    }

    match format {
        OutputFormat::Json => JsonFormatter::print(&result)?,
        OutputFormat::Text => {
            if let DiscoveryResult::Found(spec) = &result {
                print!("{}", TextFormatter::render_found(spec));
            }
        },
    }

    match result.failure() {
        Some(failure) => Err(CliError::new(
            ErrorCategory::from_failure(failure.kind),
            anyhow!(failure.message.clone()),
        )
        .into()),
        None => Ok(()),
    }
}

fn apply_overrides(config: &mut Config, args: &DiscoverArgs) {
    if let Some(relay) = &args.relay {
        config.relay.base_url = Some(relay.clone());
    }
    if let Some(ms) = args.timeout_ms {
        config.probe.timeout_ms = ms;
    }
    if let Some(ms) = args.relay_timeout_ms {
        config.relay.timeout_ms = ms;
    }
    if let Some(ms) = args.deadline_ms {
        config.discovery.deadline_ms = Some(ms);
    }
    if let Some(width) = args.batch_width {
        config.discovery.batch_width = usize::from(width);
    }
}

async fn record_visit(endpoint: &str) {
    let client = match reqwest::Client::builder().timeout(TRACKING_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            debug!(error = %err, "Skipping visit tracking");
            return;
        },
    };
    let mut tracker = VisitTracker::new(endpoint, client);
    tracker.track("discover").await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn discover_args(extra: &[&str]) -> DiscoverArgs {
        let mut argv = vec!["specfind", "discover", "example.com"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Discover(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.relay.base_url = Some("http://file-relay".to_string());

        let args = discover_args(&[
            "--relay",
            "http://flag-relay",
            "--timeout-ms",
            "750",
            "--deadline-ms",
            "20000",
            "--batch-width",
            "3",
        ]);
        apply_overrides(&mut config, &args);

        assert_eq!(config.relay.base_url.as_deref(), Some("http://flag-relay"));
        assert_eq!(config.probe.timeout_ms, 750);
        assert_eq!(config.discovery.deadline_ms, Some(20_000));
        assert_eq!(config.discovery.batch_width, 3);
        assert_eq!(config.relay.timeout_ms, 10_000);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        apply_overrides(&mut config, &discover_args(&[]));
        assert_eq!(config, Config::default());
    }
}
