//! Text output formatting

use colored::Colorize;
use specfind_core::{CandidatePlan, DiscoveredSpec, SpecSummary};
use std::fmt::Write as _;

pub struct TextFormatter;

impl TextFormatter {
    /// Render a located document as a short summary block.
    pub fn render_found(spec: &DiscoveredSpec) -> String {
        let summary = SpecSummary::from_value(&spec.data);
        let title = summary.title.as_deref().unwrap_or("Untitled API");

        let mut out = String::new();
        let _ = write!(out, "{} {}", "✓".green().bold(), title.bold());
        if let Some(version) = &summary.version {
            let _ = write!(out, " {}", format!("v{version}").dimmed());
        }
        out.push('\n');
        let _ = writeln!(out, "  {:<9}{}", "url", spec.url.cyan());
        let _ = writeln!(out, "  {:<9}{}", "format", summary.dialect);
        let _ = writeln!(out, "  {:<9}{}", "paths", summary.path_count);
        let _ = writeln!(out, "  {:<9}{}", "found in", spec.tier);
        if spec.via_relay {
            let _ = writeln!(out, "  {}", "fetched through the relay".yellow());
        }
        out
    }

    /// Render the candidate plan grouped by tier.
    ///
    /// Empty tiers are listed too, so the numbering stays readable.
    pub fn render_plan(plan: &CandidatePlan) -> String {
        let mut out = String::new();
        for group in plan.tiers() {
            let _ = writeln!(
                out,
                "{} {}",
                group.tier.to_string().bold(),
                format!("[{}]", group.urls.len()).dimmed()
            );
            if group.urls.is_empty() {
                let _ = writeln!(out, "  {}", "(none)".dimmed());
            }
            for url in &group.urls {
                let _ = writeln!(out, "  {url}");
            }
        }
        let _ = write!(out, "{} candidates", plan.len());
        out
    }
}
