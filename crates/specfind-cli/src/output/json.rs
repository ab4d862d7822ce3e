//! JSON output formatting

use anyhow::Result;
use serde::Serialize;
use specfind_core::{Candidate, CandidatePlan};

pub struct JsonFormatter;

impl JsonFormatter {
    /// Print any serializable value as pretty JSON on stdout.
    pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        println!("{json}");
        Ok(())
    }

    /// Flatten the plan into `{url, tier}` rows in probe order.
    pub fn plan_rows(plan: &CandidatePlan) -> Vec<Candidate> {
        plan.iter().collect()
    }
}
