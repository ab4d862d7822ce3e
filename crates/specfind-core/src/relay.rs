//! Client for the CORS relay collaborator.
//!
//! The relay fetches a target URL server-side and answers with a JSON
//! envelope:
//!
//! ```text
//! GET <base>/proxy-fetch?url=<target>
//!
//! 200 {"success": true, "data": {...}, "url": "<target>", "contentType": "..."}
//! 4xx {"success": false, "error": "...", "status": 404}
//! 500 {"success": false, "error": "Request timeout", "details": "..."}
//! ```
//!
//! The relay itself is not part of this crate; only its contract is.

use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default timeout for the relay leg of a probe.
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// The relay's response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEnvelope {
    /// Whether the relay fetched and parsed the target.
    #[serde(default)]
    pub success: bool,
    /// Parsed JSON body of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The target URL, echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Content type reported by the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the body is JSON but does not look like an API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Status code the target answered with, on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// First bytes of a non-JSON target body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Fetches candidates through the relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base: Url,
    timeout: Duration,
    client: Client,
}

impl RelayClient {
    /// Create a client for the relay at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not an absolute
    /// `http`/`https` URL that can carry a path.
    pub fn new(base_url: &str, timeout: Duration, client: Client) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| Error::Config(format!("Invalid relay URL '{base_url}': {e}")))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Relay URL must be an http or https URL, got '{base_url}'"
            )));
        }
        Ok(Self {
            base,
            timeout,
            client,
        })
    }

    /// Relay base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Timeout applied to each relay call.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The relay request for `target`.
    ///
    /// ```rust
    /// use specfind_core::relay::RelayClient;
    /// use std::time::Duration;
    ///
    /// let relay = RelayClient::new("http://localhost:3001/api", Duration::from_secs(10), reqwest::Client::new())?;
    /// assert_eq!(
    ///     relay.request_url("https://example.com/docs?format=json").as_str(),
    ///     "http://localhost:3001/api/proxy-fetch?url=https%3A%2F%2Fexample.com%2Fdocs%3Fformat%3Djson",
    /// );
    /// # Ok::<(), specfind_core::Error>(())
    /// ```
    #[must_use]
    pub fn request_url(&self, target: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("proxy-fetch");
        }
        url.query_pairs_mut().append_pair("url", target);
        url
    }

    /// Fetch `target` through the relay and return the target's JSON body.
    ///
    /// The body is returned as-is; deciding whether it is an API
    /// description is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the relay does not answer within the timeout
    /// - [`Error::Network`] if the relay itself cannot be reached
    /// - [`Error::Relay`] if the relay answers with an error status, an
    ///   unparsable envelope, `success: false`, or no `data`
    pub async fn fetch(&self, target: &str) -> Result<Value> {
        let request_url = self.request_url(target);
        debug!(target, relay = %request_url, "fetching through relay");

        let call = async {
            let response = self
                .client
                .get(request_url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "relay did not answer within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        let envelope: RelayEnvelope = serde_json::from_str(&body).map_err(|e| {
            Error::Relay(format!("unparsable envelope (HTTP {}): {e}", status.as_u16()))
        })?;

        if !status.is_success() || !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("relay answered HTTP {}", status.as_u16()));
            return Err(Error::Relay(message));
        }

        if let Some(warning) = &envelope.warning {
            debug!(target, warning = %warning, "relay warning");
        }

        envelope
            .data
            .ok_or_else(|| Error::Relay("envelope carries no data".to_string()))
    }
}
