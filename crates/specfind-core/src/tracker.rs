//! One-shot visit tracking.
//!
//! Records a page visit with a logging endpoint at most once per tracker.
//! The "already tracked" flag lives in the tracker value itself, so whoever
//! owns the tracker decides its lifetime and can reset it.

use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Serialize)]
struct Visit<'a> {
    page: &'a str,
    timestamp: String,
}

/// Posts a single visit record to a logging endpoint.
#[derive(Debug, Clone)]
pub struct VisitTracker {
    endpoint: String,
    client: Client,
    tracked: bool,
}

impl VisitTracker {
    /// Create an untracked tracker for `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
            tracked: false,
        }
    }

    /// Whether a visit has been recorded successfully.
    #[must_use]
    pub const fn has_tracked(&self) -> bool {
        self.tracked
    }

    /// Forget the recorded visit.
    pub const fn reset(&mut self) {
        self.tracked = false;
    }

    /// Record a visit to `page`, unless one was already recorded.
    ///
    /// Returns whether a request was sent. Failures are logged and
    /// swallowed; a failed attempt leaves the tracker untracked.
    pub async fn track(&mut self, page: &str) -> bool {
        if self.tracked {
            return false;
        }

        let visit = Visit {
            page,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        match self.client.post(&self.endpoint).json(&visit).send().await {
            Ok(response) if response.status().is_success() => {
                self.tracked = true;
                debug!(endpoint = %self.endpoint, page, "visit tracked");
            },
            Ok(response) => {
                warn!(
                    endpoint = %self.endpoint,
                    status = response.status().as_u16(),
                    "visit tracking rejected"
                );
            },
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "visit tracking failed");
            },
        }
        true
    }
}
