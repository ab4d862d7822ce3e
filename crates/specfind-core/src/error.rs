//! Error types and handling for specfind-core operations.
//!
//! Errors are categorized so callers can decide how to react. Most of them
//! never leave the library: per-candidate failures are absorbed by the
//! discovery driver and only decide whether the relay leg is attempted.
//!
//! ## Error Categories
//!
//! - **Input Errors**: the user-supplied string is not a usable URL
//! - **Network Errors**: connection refused, DNS failures, broken transfers
//! - **Timeouts**: a probe or relay call exceeded its deadline
//! - **Relay Errors**: the relay answered but reported failure
//! - **Configuration Errors**: invalid settings or config files
//!
//! ## Relay Fallback
//!
//! ```rust
//! use specfind_core::Error;
//!
//! let err = Error::Timeout("probe exceeded 5s".to_string());
//! // Timeouts abandon the candidate, they never trigger the relay
//! assert!(!err.is_network_class());
//! ```

use thiserror::Error;

/// The main error type for specfind-core operations.
///
/// `Display` provides user-friendly messages; `Debug` keeps the full
/// source chain.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received.
    ///
    /// Connection refusals, DNS failures and interrupted bodies land here.
    /// This is the class of failure that triggers the relay fallback.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The relay was reachable but reported a failure, or returned an
    /// envelope that could not be understood.
    #[error("Relay error: {0}")]
    Relay(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this failure is network/CORS-class.
    ///
    /// Only these failures send a candidate through the relay. The candidate
    /// is abandoned instead when the request timed out or could not be
    /// built, and whenever the server did answer: an error status, a
    /// redirect loop or an undecodable body.
    #[must_use]
    pub fn is_network_class(&self) -> bool {
        match self {
            Self::Network(e) => {
                !e.is_timeout()
                    && !e.is_status()
                    && !e.is_builder()
                    && !e.is_redirect()
                    && !e.is_decode()
            },
            _ => false,
        }
    }

    /// Get the error category as a string identifier, for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Relay(_) => "relay",
            Self::Config(_) => "config",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unwrap_used,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::InvalidUrl("not a url".to_string()),
            Error::Timeout("probe timed out".to_string()),
            Error::Relay("relay said no".to_string()),
            Error::Config("missing field".to_string()),
        ];

        for error in errors {
            let error_string = error.to_string();
            assert!(!error_string.is_empty());
            match error {
                Error::InvalidUrl(msg) => {
                    assert!(error_string.contains("Invalid URL"));
                    assert!(error_string.contains(&msg));
                },
                Error::Timeout(msg) => {
                    assert!(error_string.contains("Timeout"));
                    assert!(error_string.contains(&msg));
                },
                Error::Relay(msg) => {
                    assert!(error_string.contains("Relay error"));
                    assert!(error_string.contains(&msg));
                },
                Error::Config(msg) => {
                    assert!(error_string.contains("Configuration error"));
                    assert!(error_string.contains(&msg));
                },
                Error::Network(_) => {},
            }
        }
    }

    #[test]
    fn test_only_network_errors_are_network_class() {
        let not_network = vec![
            Error::Timeout("t".into()),
            Error::Relay("r".into()),
            Error::InvalidUrl("u".into()),
        ];
        for error in not_network {
            assert!(!error.is_network_class(), "{error:?} must not trigger relay");
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_class() {
        // Bind then drop to obtain a local port with nothing listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://127.0.0.1:{port}/"))
            .send()
            .await
            .unwrap_err();
        let error = Error::Network(err);

        assert!(error.is_network_class());
        assert_eq!(error.category(), "network");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::InvalidUrl(String::new()).category(), "invalid_url");
        assert_eq!(Error::Timeout(String::new()).category(), "timeout");
        assert_eq!(Error::Relay(String::new()).category(), "relay");
        assert_eq!(Error::Config(String::new()).category(), "config");
    }
}
