//! Single-candidate probing.
//!
//! A probe fetches one candidate URL and decides whether it serves an API
//! description. The cascade is:
//!
//! 1. **Direct** - `GET` the candidate with a JSON-preferring `Accept`
//!    header, bounded by the probe timeout and a body size cap
//! 2. **Relay** - only when the direct request failed with a network-class
//!    error and a relay is configured, fetch the same candidate through it
//! 3. **Validate** - the body must parse as JSON and carry a marker key
//!
//! A server that answers with an error status had its chance; the relay is
//! not consulted. A timed-out candidate is abandoned the same way.
//! Probing never fails: every error is folded into a [`ProbeOutcome`].

use crate::relay::RelayClient;
use crate::validate::{is_api_description, parse_api_description};
use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default timeout for the direct leg of a probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `Accept` header sent with direct probes.
pub const DEFAULT_ACCEPT: &str = "application/json, application/yaml, */*";

/// Largest body a direct probe will read before giving up on the candidate.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// A validated API description found at a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedSpec {
    /// The parsed document.
    pub data: Value,
    /// The candidate URL that served it. Never the relay URL.
    pub source_url: String,
    /// Whether the body arrived through the relay.
    pub via_relay: bool,
}

/// Result of probing one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The candidate serves an API description.
    Matched(MatchedSpec),
    /// The candidate answered, but not with an API description.
    NotASpec,
    /// Neither the direct request nor the relay produced a body.
    Unreachable,
    /// The candidate did not answer in time.
    TimedOut,
}

impl ProbeOutcome {
    /// Short identifier used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Matched(_) => "matched",
            Self::NotASpec => "not_a_spec",
            Self::Unreachable => "unreachable",
            Self::TimedOut => "timed_out",
        }
    }

    /// Consume the outcome, keeping only a match.
    #[must_use]
    pub fn into_match(self) -> Option<MatchedSpec> {
        match self {
            Self::Matched(spec) => Some(spec),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probes candidates with a shared HTTP client.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
    accept: String,
    max_body_bytes: u64,
    relay: Option<RelayClient>,
}

impl Prober {
    /// Create a prober without a relay.
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            accept: DEFAULT_ACCEPT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            relay: None,
        }
    }

    /// Route network-class failures through `relay`.
    #[must_use]
    pub fn with_relay(mut self, relay: RelayClient) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Override the `Accept` header of direct requests.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Cap the number of body bytes read from a direct response.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max: u64) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Timeout of the direct leg.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a relay is configured.
    #[must_use]
    pub const fn has_relay(&self) -> bool {
        self.relay.is_some()
    }

    /// Probe a single candidate.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let outcome = match self.fetch_direct(url).await {
            Ok(Some(data)) => ProbeOutcome::Matched(MatchedSpec {
                data,
                source_url: url.to_string(),
                via_relay: false,
            }),
            Ok(None) => ProbeOutcome::NotASpec,
            Err(e) if e.is_network_class() => {
                debug!(url, category = e.category(), error = %e, "direct request failed");
                self.probe_via_relay(url).await
            },
            Err(e) => {
                debug!(url, category = e.category(), error = %e, "direct request abandoned");
                if is_timeout(&e) {
                    ProbeOutcome::TimedOut
                } else {
                    ProbeOutcome::Unreachable
                }
            },
        };
        debug!(url, outcome = outcome.label(), "probe finished");
        outcome
    }

    /// `Ok(None)` when the server answered but not with an API description.
    async fn fetch_direct(&self, url: &str) -> Result<Option<Value>> {
        let call = async {
            let mut response = self
                .client
                .get(url)
                .header(ACCEPT, self.accept.as_str())
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                debug!(url, status = status.as_u16(), "non-success status");
                return Ok(None);
            }
            if response
                .content_length()
                .is_some_and(|len| len > self.max_body_bytes)
            {
                debug!(url, limit = self.max_body_bytes, "declared body too large");
                return Ok(None);
            }

            let mut body = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if body.len() as u64 + chunk.len() as u64 > self.max_body_bytes {
                    debug!(url, limit = self.max_body_bytes, "body exceeded limit");
                    return Ok(None);
                }
                body.extend_from_slice(&chunk);
            }
            Ok::<_, Error>(
                std::str::from_utf8(&body)
                    .ok()
                    .and_then(parse_api_description),
            )
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "{url} did not answer within {}ms",
                    self.timeout.as_millis()
                ))
            })?
    }

    async fn probe_via_relay(&self, url: &str) -> ProbeOutcome {
        let Some(relay) = &self.relay else {
            return ProbeOutcome::Unreachable;
        };
        match relay.fetch(url).await {
            Ok(data) if is_api_description(&data) => ProbeOutcome::Matched(MatchedSpec {
                data,
                source_url: url.to_string(),
                via_relay: true,
            }),
            Ok(_) => ProbeOutcome::NotASpec,
            Err(e) => {
                debug!(url, category = e.category(), error = %e, "relay leg failed");
                if is_timeout(&e) {
                    ProbeOutcome::TimedOut
                } else {
                    ProbeOutcome::Unreachable
                }
            },
        }
    }
}

fn is_timeout(error: &Error) -> bool {
    match error {
        Error::Timeout(_) => true,
        Error::Network(e) => e.is_timeout(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn closed_port_url(path: &str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}{path}")
    }

    fn prober() -> Prober {
        Prober::new(Client::new(), Duration::from_secs(2))
    }

    fn relay_for(server: &MockServer) -> RelayClient {
        RelayClient::new(&server.uri(), Duration::from_secs(2), Client::new()).unwrap()
    }

    #[tokio::test]
    async fn test_direct_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .and(header_exists("accept"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"openapi": "3.0.0", "paths": {}})),
            )
            .mount(&server)
            .await;

        let url = format!("{}/openapi.json", server.uri());
        match prober().probe(&url).await {
            ProbeOutcome::Matched(spec) => {
                assert_eq!(spec.source_url, url);
                assert!(!spec.via_relay);
                assert_eq!(spec.data["openapi"], "3.0.0");
            },
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plain_json_is_not_a_spec() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hello": "world"})))
            .mount(&server)
            .await;

        let outcome = prober().probe(&format!("{}/docs", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::NotASpec);
    }

    #[tokio::test]
    async fn test_html_is_not_a_spec() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Swagger UI</html>"))
            .mount(&server)
            .await;

        let outcome = prober().probe(&format!("{}/docs", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::NotASpec);
    }

    #[tokio::test]
    async fn test_error_status_skips_relay() {
        let server = MockServer::start().await;
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&relay)
            .await;

        let prober = prober().with_relay(relay_for(&relay));
        // wiremock answers 404 for anything unmatched
        let outcome = prober.probe(&format!("{}/missing", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::NotASpec);
    }

    #[tokio::test]
    async fn test_connection_failure_without_relay_is_unreachable() {
        let outcome = prober().probe(&closed_port_url("/openapi.json")).await;
        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }

    #[tokio::test]
    async fn test_connection_failure_falls_back_to_relay() {
        let relay = MockServer::start().await;
        let target = closed_port_url("/swagger.json");
        Mock::given(method("GET"))
            .and(path("/proxy-fetch"))
            .and(query_param("url", target.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"swagger": "2.0", "paths": {}},
                "url": target,
                "contentType": "application/json"
            })))
            .expect(1)
            .mount(&relay)
            .await;

        let prober = prober().with_relay(relay_for(&relay));
        match prober.probe(&target).await {
            ProbeOutcome::Matched(spec) => {
                assert_eq!(spec.source_url, target);
                assert!(spec.via_relay);
            },
            other => panic!("expected relay match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_relay_payload_is_validated() {
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proxy-fetch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"hello": "world"},
                "warning": "Response is valid JSON but may not be Swagger/OpenAPI format"
            })))
            .mount(&relay)
            .await;

        let prober = prober().with_relay(relay_for(&relay));
        let outcome = prober.probe(&closed_port_url("/docs")).await;
        assert_eq!(outcome, ProbeOutcome::NotASpec);
    }

    #[tokio::test]
    async fn test_relay_failure_is_unreachable() {
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proxy-fetch"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": "Failed to fetch URL"
            })))
            .mount(&relay)
            .await;

        let prober = prober().with_relay(relay_for(&relay));
        let outcome = prober.probe(&closed_port_url("/docs")).await;
        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }

    #[tokio::test]
    async fn test_slow_candidate_times_out_without_relay() {
        let server = MockServer::start().await;
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"openapi": "3.0.0"}))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&relay)
            .await;

        let prober = Prober::new(Client::new(), Duration::from_millis(200))
            .with_relay(relay_for(&relay));
        let started = std::time::Instant::now();
        let outcome = prober.probe(&format!("{}/slow", server.uri())).await;

        assert_eq!(outcome, ProbeOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_oversized_body_is_not_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "openapi": "3.0.0",
                "info": {"title": "A document comfortably longer than the limit"},
                "paths": {}
            })))
            .mount(&server)
            .await;

        let url = format!("{}/openapi.json", server.uri());
        let capped = prober().with_max_body_bytes(32);
        assert_eq!(capped.probe(&url).await, ProbeOutcome::NotASpec);

        let roomy = prober().with_max_body_bytes(4096);
        assert!(roomy.probe(&url).await.into_match().is_some());
    }

    #[tokio::test]
    async fn test_redirect_loop_skips_relay() {
        let server = MockServer::start().await;
        let relay = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&relay)
            .await;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .unwrap();
        let prober = Prober::new(client, Duration::from_secs(2)).with_relay(relay_for(&relay));
        let outcome = prober.probe(&format!("{}/loop", server.uri())).await;

        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ProbeOutcome::NotASpec.to_string(), "not_a_spec");
        assert_eq!(ProbeOutcome::TimedOut.label(), "timed_out");
        assert!(ProbeOutcome::Unreachable.into_match().is_none());
    }
}
