//! Shared argument types and groups for the specfind CLI.
//!
//! - [`OutputArgs`] - `--format` / `--json` selection with TTY detection
//! - [`Verbosity`] - level derived from the global logging flags

mod output;
mod verbosity;

pub use output::{OutputArgs, OutputFormat};
pub use verbosity::Verbosity;
