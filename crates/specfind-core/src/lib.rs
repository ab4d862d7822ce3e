//! # specfind-core
//!
//! Locate the machine-readable OpenAPI/Swagger document behind whatever URL
//! a user pastes, usually a documentation page rather than the spec itself.
//!
//! ## Architecture
//!
//! - **Input**: normalize the raw string into a URL and its components
//! - **Candidates**: generate an ordered, deduplicated plan of guesses
//!   grouped into priority tiers
//! - **Probe**: fetch one guess, falling back to a CORS relay on
//!   network-class failures, and validate the payload
//! - **Discovery**: drive the plan tier by tier with bounded concurrency
//!   and return exactly one [`DiscoveryResult`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specfind_core::{Config, SpecDiscovery};
//!
//! # async fn example() -> specfind_core::Result<()> {
//! let config = Config::load()?;
//! let discovery = SpecDiscovery::new(config.to_options())?;
//!
//! let result = discovery.discover("https://petstore.example.com/docs").await;
//! if let Some(url) = result.url() {
//!     println!("API description at {url}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Per-candidate failures never escape the driver. The only failures a
//! caller sees are an invalid input, an exhausted plan, or an expired
//! deadline, all reported through [`DiscoveryResult::Failed`].

/// Candidate URL generation and the pattern catalog
pub mod candidates;
/// Configuration loading and environment overrides
pub mod config;
/// The tiered discovery driver
pub mod discovery;
/// Error types and result aliases
pub mod error;
/// Raw input normalization
pub mod input;
/// Single-candidate probing
pub mod probe;
/// CORS relay client
pub mod relay;
/// One-shot visit tracking
pub mod tracker;
/// API description validation
pub mod validate;

pub use candidates::{Candidate, CandidatePlan, Catalog, Tier};
pub use config::Config;
pub use discovery::{
    DiscoveredSpec, DiscoveryFailure, DiscoveryOptions, DiscoveryResult, FailureKind,
    ProgressCallback, SpecDiscovery, TierProgress,
};
pub use error::{Error, Result};
pub use input::{NormalizedInput, ParsedOrigin, normalize};
pub use probe::{MatchedSpec, ProbeOutcome, Prober};
pub use relay::{RelayClient, RelayEnvelope};
pub use tracker::VisitTracker;
pub use validate::{SpecSummary, is_api_description, parse_api_description};
