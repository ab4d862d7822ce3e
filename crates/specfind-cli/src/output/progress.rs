//! Progress spinner for discovery runs

use indicatif::{ProgressBar, ProgressStyle};
use specfind_core::{ProgressCallback, TierProgress};
use std::sync::Arc;
use std::time::Duration;

/// Spinner on stderr naming the tier being probed.
pub struct DiscoverySpinner {
    bar: ProgressBar,
}

impl DiscoverySpinner {
    /// Start a spinner for the given input.
    pub fn start(input: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Looking for an API description behind {input}"));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Callback that updates the spinner message as tiers start.
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |progress: &TierProgress| bar.set_message(message(progress)))
    }

    /// Remove the spinner from the terminal.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

fn message(progress: &TierProgress) -> String {
    format!(
        "Probing {}: {} candidates ({}/{} done)",
        progress.tier, progress.candidates, progress.probed_so_far, progress.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use specfind_core::Tier;

    #[test]
    fn test_message_names_tier_and_counts() {
        let text = message(&TierProgress {
            tier: Tier::SameLevel,
            candidates: 40,
            probed_so_far: 12,
            total: 90,
        });
        assert!(text.contains("tier 3"));
        assert!(text.contains("40 candidates"));
        assert!(text.contains("12/90"));
    }
}
