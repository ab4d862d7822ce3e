//! Command implementations for the specfind CLI

mod candidates;
mod config;
mod discover;

pub use candidates::execute as show_candidates;
pub use config::{execute as show_config, load as load_config};
pub use discover::execute as discover;
