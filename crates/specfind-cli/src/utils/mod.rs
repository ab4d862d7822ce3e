//! Process-level helpers for the CLI.

pub mod logging;
