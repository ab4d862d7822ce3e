//! CLI error handling with semantic exit codes.
//!
//! Errors carry a category that maps to a specific exit code, so scripts can
//! tell "nothing found" apart from "bad input" or "network down".
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | An API description was found |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid URL, arguments or configuration |
//! | 3 | `NotFound` | Every candidate was probed without a match |
//! | 5 | `Network` | The HTTP stack could not be set up or reached |
//! | 6 | `Timeout` | The overall discovery deadline expired |
//!
//! # Usage
//!
//! ```bash
//! specfind discover https://api.example.com/docs --json > result.json
//! case $? in
//!     0) echo "found" ;;
//!     3) echo "no API description" ;;
//!     *) echo "other error" ;;
//! esac
//! ```

use specfind_core::FailureKind;
use std::fmt;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid input, arguments or configuration (exit code 2).
    Usage = 2,

    /// No API description was found (exit code 3).
    NotFound = 3,

    /// Network failure outside of individual probes (exit code 5).
    Network = 5,

    /// Operation timed out (exit code 6).
    Timeout = 6,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Timeout => "timeout",
        }
    }

    /// Category for a terminal discovery failure.
    #[must_use]
    pub const fn from_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::InvalidInput => Self::Usage,
            FailureKind::Exhausted => Self::NotFound,
            FailureKind::DeadlineExceeded => Self::Timeout,
        }
    }

    /// Category for a library error.
    #[must_use]
    pub const fn from_core(err: &specfind_core::Error) -> Self {
        use specfind_core::Error;
        match err {
            Error::InvalidUrl(_) | Error::Config(_) => Self::Usage,
            Error::Network(_) | Error::Relay(_) => Self::Network,
            Error::Timeout(_) => Self::Timeout,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Fallback for errors that were not categorized explicitly.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Check before Network so "connection timeout" is a timeout
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("relay")
        {
            return Self::Network;
        }

        if msg_lower.contains("couldn't detect") || msg_lower.contains("not found") {
            return Self::NotFound;
        }

        if msg_lower.contains("invalid url")
            || msg_lower.contains("configuration error")
            || msg_lower.contains("invalid value")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so the full context chain survives.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Categorize a library error.
    pub fn from_core(err: specfind_core::Error) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Create an internal error.
    pub fn internal(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Internal, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A `CliError` anywhere in the chain decides; otherwise the category is
/// inferred from the message.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<specfind_core::Error>() {
        return ErrorCategory::from_core(core_err).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCategory::Internal.exit_code(), 1);
        assert_eq!(ErrorCategory::Usage.exit_code(), 2);
        assert_eq!(ErrorCategory::NotFound.exit_code(), 3);
        assert_eq!(ErrorCategory::Network.exit_code(), 5);
        assert_eq!(ErrorCategory::Timeout.exit_code(), 6);
    }

    #[test]
    fn test_failure_kinds_map_to_categories() {
        assert_eq!(
            ErrorCategory::from_failure(FailureKind::InvalidInput),
            ErrorCategory::Usage
        );
        assert_eq!(
            ErrorCategory::from_failure(FailureKind::Exhausted),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ErrorCategory::from_failure(FailureKind::DeadlineExceeded),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn test_core_errors_map_to_categories() {
        use specfind_core::Error;
        assert_eq!(
            ErrorCategory::from_core(&Error::Config("bad".into())),
            ErrorCategory::Usage
        );
        assert_eq!(
            ErrorCategory::from_core(&Error::Timeout("slow".into())),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::from_core(&Error::Relay("down".into())),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_infer_from_message() {
        assert_eq!(
            ErrorCategory::infer_from_message("Connection timed out"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::infer_from_message("DNS lookup failed"),
            ErrorCategory::Network
        );
        assert_eq!(
            ErrorCategory::infer_from_message(
                "Couldn't detect JSON from the provided URL. Please provide JSON manually."
            ),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ErrorCategory::infer_from_message("something odd"),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_exit_code_prefers_explicit_category() {
        let err: anyhow::Error =
            CliError::new(ErrorCategory::NotFound, anyhow!("timed out somewhere")).into();
        assert_eq!(exit_code_from_error(&err), 3);
    }

    #[test]
    fn test_exit_code_from_core_error() {
        let err: anyhow::Error = specfind_core::Error::InvalidUrl("x".into()).into();
        assert_eq!(exit_code_from_error(&err), 2);
    }

    #[test]
    fn test_exit_code_inferred() {
        assert_eq!(exit_code_from_error(&anyhow!("request timeout")), 6);
        assert_eq!(exit_code_from_error(&anyhow!("boom")), 1);
    }

    #[test]
    fn test_display_uses_source() {
        let err = CliError::usage(anyhow!("Invalid URL format. Please provide a valid URL."));
        assert_eq!(
            err.to_string(),
            "Invalid URL format. Please provide a valid URL."
        );
    }
}
