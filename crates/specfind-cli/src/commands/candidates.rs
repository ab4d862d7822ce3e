//! `specfind candidates`: print the probe plan without network access

use anyhow::Result;
use specfind_core::{CandidatePlan, Catalog, Config, normalize};

use crate::args::{OutputArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{JsonFormatter, TextFormatter};

/// Build and print the candidate plan for `url`.
pub fn execute(url: &str, output: &OutputArgs, config: &Config) -> Result<()> {
    let input = normalize(url).map_err(CliError::from_core)?;
    let catalog = Catalog::default().with_extra_root_paths(&config.catalog.extra_root_paths);
    let plan = CandidatePlan::build(&input, &catalog);

    match output.resolve() {
        OutputFormat::Json => JsonFormatter::print(&JsonFormatter::plan_rows(&plan))?,
        OutputFormat::Text => println!("{}", TextFormatter::render_plan(&plan)),
    }
    Ok(())
}
