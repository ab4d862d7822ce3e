//! Output rendering for the CLI

mod json;
mod progress;
mod text;

pub use json::JsonFormatter;
pub use progress::DiscoverySpinner;
pub use text::TextFormatter;
