//! The discovery driver.
//!
//! Given whatever the user pasted, [`SpecDiscovery`] normalizes it, builds
//! the [`CandidatePlan`] and probes tier by tier until a candidate serves an
//! API description.
//!
//! ## Tier execution
//!
//! Tiers run strictly one after another. Within a tier, probes run
//! concurrently through an ordered buffered stream whose width comes from
//! [`Tier::concurrency`]: one at a time for the literal and immediate-suffix
//! tiers, all at once for tiers 2 and 3, and `batch_width` for tiers 4 and 5.
//!
//! Outcomes are consumed in candidate order, so when two candidates of a
//! tier both validate, the one listed first wins. Returning early drops
//! the stream, which cancels every probe of the tier still in flight.
//!
//! ## Example
//!
//! ```rust,no_run
//! use specfind_core::discovery::{DiscoveryOptions, DiscoveryResult, SpecDiscovery};
//!
//! # async fn example() -> specfind_core::Result<()> {
//! let discovery = SpecDiscovery::new(DiscoveryOptions::default())?;
//!
//! match discovery.discover("petstore.swagger.io").await {
//!     DiscoveryResult::Found(spec) => println!("found at {}", spec.url),
//!     DiscoveryResult::Failed(failure) => eprintln!("{}", failure.message),
//! }
//! # Ok(())
//! # }
//! ```

use crate::candidates::{CandidatePlan, Catalog, Tier};
use crate::input::{INVALID_INPUT_MESSAGE, normalize};
use crate::probe::{DEFAULT_ACCEPT, DEFAULT_PROBE_TIMEOUT, ProbeOutcome, Prober};
use crate::relay::{DEFAULT_RELAY_TIMEOUT, RelayClient};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Message returned when every candidate was probed without a match.
pub const EXHAUSTED_MESSAGE: &str =
    "Couldn't detect JSON from the provided URL. Please provide JSON manually.";

/// Default concurrency for the root and ancestor tiers.
pub const DEFAULT_BATCH_WIDTH: usize = 5;

/// Settings for a [`SpecDiscovery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Timeout of each direct probe.
    pub probe_timeout: Duration,
    /// `Accept` header of direct probes.
    pub accept: String,
    /// Relay base URL. `None` disables the relay leg.
    pub relay_url: Option<String>,
    /// Timeout of each relay call.
    pub relay_timeout: Duration,
    /// Concurrency of tiers 4 and 5.
    pub batch_width: usize,
    /// Bound on the whole multi-tier search.
    pub deadline: Option<Duration>,
    /// Extra absolute paths probed in the root tier.
    pub extra_root_paths: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            accept: DEFAULT_ACCEPT.to_string(),
            relay_url: None,
            relay_timeout: DEFAULT_RELAY_TIMEOUT,
            batch_width: DEFAULT_BATCH_WIDTH,
            deadline: None,
            extra_root_paths: Vec::new(),
        }
    }
}

/// Reported when a non-empty tier starts probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProgress {
    /// The tier about to be probed.
    pub tier: Tier,
    /// Number of candidates in the tier.
    pub candidates: usize,
    /// Candidates probed in earlier tiers.
    pub probed_so_far: usize,
    /// Candidates in the whole plan.
    pub total: usize,
}

/// Callback invoked with [`TierProgress`] as tiers start.
pub type ProgressCallback = Arc<dyn Fn(&TierProgress) + Send + Sync>;

/// A located API description.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredSpec {
    /// The parsed document.
    pub data: Value,
    /// The candidate URL that served it.
    pub url: String,
    /// The tier the candidate belonged to.
    pub tier: Tier,
    /// Whether the document arrived through the relay.
    pub via_relay: bool,
}

/// Why discovery ended without a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The input could not be turned into a URL; nothing was probed.
    InvalidInput,
    /// Every candidate was probed without a match.
    Exhausted,
    /// The overall deadline expired before the search finished.
    DeadlineExceeded,
}

/// A terminal failure with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    /// Failure class.
    pub kind: FailureKind,
    /// Message suitable for display.
    pub message: String,
}

/// The single value produced by a discovery call.
///
/// Serializes as `{"success": true, "data": ..., "url": ...}` or
/// `{"success": false, "error": ...}`, with `tier`, `viaRelay` and `kind`
/// as additional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryResult {
    /// A candidate served an API description.
    Found(DiscoveredSpec),
    /// No API description was located.
    Failed(DiscoveryFailure),
}

impl DiscoveryResult {
    fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed(DiscoveryFailure {
            kind,
            message: message.into(),
        })
    }

    /// Whether a document was found.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// URL of the matching candidate.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(spec) => Some(&spec.url),
            Self::Failed(_) => None,
        }
    }

    /// The discovered document.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Found(spec) => Some(&spec.data),
            Self::Failed(_) => None,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&DiscoveryFailure> {
        match self {
            Self::Found(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireResult<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    via_relay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
}

impl Serialize for DiscoveryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Found(spec) => WireResult {
                success: true,
                data: Some(&spec.data),
                url: Some(&spec.url),
                tier: Some(spec.tier.index()),
                via_relay: Some(spec.via_relay),
                error: None,
                kind: None,
            },
            Self::Failed(failure) => WireResult {
                success: false,
                data: None,
                url: None,
                tier: None,
                via_relay: None,
                error: Some(&failure.message),
                kind: Some(failure.kind),
            },
        };
        wire.serialize(serializer)
    }
}

/// Locates the API description behind a user-supplied URL.
///
/// Holds no state between calls; every [`discover`](Self::discover) starts
/// cold. The HTTP client is shared so connections can be reused within a
/// call.
#[derive(Debug, Clone)]
pub struct SpecDiscovery {
    prober: Prober,
    catalog: Catalog,
    batch_width: usize,
    deadline: Option<Duration>,
}

impl SpecDiscovery {
    /// Build a discovery driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be constructed
    /// and [`Error::Config`] if the relay URL is invalid.
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        let client = build_client()?;
        let mut prober = Prober::new(client.clone(), options.probe_timeout)
            .with_accept(options.accept);
        if let Some(relay_url) = options.relay_url.as_deref() {
            prober = prober.with_relay(RelayClient::new(relay_url, options.relay_timeout, client)?);
        }

        Ok(Self {
            prober,
            catalog: Catalog::default().with_extra_root_paths(&options.extra_root_paths),
            batch_width: options.batch_width.max(1),
            deadline: options.deadline,
        })
    }

    /// The candidate catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Locate the API description behind `raw`.
    #[instrument(skip_all, fields(input = %raw))]
    pub async fn discover(&self, raw: &str) -> DiscoveryResult {
        self.run(raw, None).await
    }

    /// Same as [`discover`](Self::discover), reporting each tier as it
    /// starts.
    #[instrument(skip_all, fields(input = %raw))]
    pub async fn discover_with_progress(
        &self,
        raw: &str,
        progress: ProgressCallback,
    ) -> DiscoveryResult {
        self.run(raw, Some(&progress)).await
    }

    async fn run(&self, raw: &str, progress: Option<&ProgressCallback>) -> DiscoveryResult {
        let input = match normalize(raw) {
            Ok(input) => input,
            Err(e) => {
                debug!(error = %e, "input rejected");
                return DiscoveryResult::failed(FailureKind::InvalidInput, INVALID_INPUT_MESSAGE);
            },
        };

        let plan = CandidatePlan::build(&input, &self.catalog);
        debug!(literal = input.literal(), candidates = plan.len(), "candidate plan built");

        let found = match self.deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.search(&plan, progress)).await {
                    Ok(found) => found,
                    Err(_) => {
                        warn!(deadline = ?deadline, "discovery deadline exceeded");
                        return DiscoveryResult::failed(
                            FailureKind::DeadlineExceeded,
                            format!(
                                "Discovery did not finish within {}ms.",
                                deadline.as_millis()
                            ),
                        );
                    },
                }
            },
            None => self.search(&plan, progress).await,
        };

        match found {
            Some(spec) => {
                info!(
                    url = %spec.url,
                    tier = spec.tier.index(),
                    via_relay = spec.via_relay,
                    "API description found"
                );
                DiscoveryResult::Found(spec)
            },
            None => {
                debug!("all tiers exhausted");
                DiscoveryResult::failed(FailureKind::Exhausted, EXHAUSTED_MESSAGE)
            },
        }
    }

    async fn search(
        &self,
        plan: &CandidatePlan,
        progress: Option<&ProgressCallback>,
    ) -> Option<DiscoveredSpec> {
        let total = plan.len();
        let mut probed_so_far = 0;

        for group in plan.tiers() {
            if group.urls.is_empty() {
                continue;
            }
            if let Some(callback) = progress {
                callback(&TierProgress {
                    tier: group.tier,
                    candidates: group.urls.len(),
                    probed_so_far,
                    total,
                });
            }

            let width = group
                .tier
                .concurrency(self.batch_width)
                .width(group.urls.len());
            debug!(
                tier = group.tier.index(),
                candidates = group.urls.len(),
                width,
                "probing tier"
            );

            let mut outcomes = pin!(
                stream::iter(&group.urls)
                    .map(|url| self.prober.probe(url))
                    .buffered(width)
            );
            while let Some(outcome) = outcomes.next().await {
                if let ProbeOutcome::Matched(spec) = outcome {
                    return Some(DiscoveredSpec {
                        data: spec.data,
                        url: spec.source_url,
                        tier: group.tier,
                        via_relay: spec.via_relay,
                    });
                }
            }

            probed_so_far += group.urls.len();
        }

        None
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("specfind/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(Error::Network)
}
