//! Output format arguments shared by commands that print results.
//!
//! ```bash
//! specfind discover https://api.example.com/docs --format json
//! specfind discover https://api.example.com/docs --json   # Shorthand
//! specfind candidates https://api.example.com/docs -f text
//! ```

use clap::{Args, ValueEnum};
use is_terminal::IsTerminal;

/// Output format for CLI results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted text (default for terminals).
    #[default]
    Text,
    /// JSON for machine consumption (default for pipes).
    Json,
}

impl OutputFormat {
    /// Check if this format is machine-readable.
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Detect the best format based on terminal status.
    ///
    /// Returns `Text` for interactive terminals, `Json` for pipes/redirects.
    #[must_use]
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Shared output format arguments.
///
/// When no format is given, text is used on a terminal and JSON otherwise.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output format (text, json).
    ///
    /// Defaults to text for terminals, json for pipes.
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        env = "SPECFIND_OUTPUT_FORMAT"
    )]
    pub format: Option<OutputFormat>,

    /// Output as JSON (shorthand for --format json).
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl OutputArgs {
    /// Resolve to a concrete format.
    ///
    /// Priority order:
    /// 1. `--json`
    /// 2. Explicit `--format`
    /// 3. Automatic TTY detection
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        if let Some(format) = self.format {
            return format;
        }
        OutputFormat::detect()
    }
}
