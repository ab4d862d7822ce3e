//! Verbosity level derived from the global `--quiet`, `--verbose` and
//! `--debug` flags.
//!
//! | Level | Log level | Progress spinner |
//! |-------|-----------|------------------|
//! | `Quiet` | `ERROR` | hidden |
//! | `Normal` | `WARN` | shown on a terminal |
//! | `Verbose` | `DEBUG` | shown on a terminal |
//! | `Debug` | `DEBUG` | shown on a terminal |

use tracing::Level;

/// Verbosity level for CLI output, ordered from quietest to loudest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Results and warnings (default).
    #[default]
    Normal,
    /// Adds per-probe diagnostics.
    Verbose,
    /// Full diagnostics.
    Debug,
}

impl Verbosity {
    /// Create a Verbosity from the individual flags.
    ///
    /// Priority order: debug > verbose > quiet > normal
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool, debug: bool) -> Self {
        if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Maximum tracing level for this verbosity.
    #[must_use]
    pub const fn log_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose | Self::Debug => Level::DEBUG,
        }
    }

    /// Check if output should be suppressed (quiet mode).
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose mode is enabled.
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
            Self::Debug => write!(f, "debug"),
        }
    }
}
