//! `specfind config` and configuration loading shared by all commands

use anyhow::Result;
use specfind_core::Config;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Load the effective configuration.
///
/// An explicit `--config` path wins over `SPECFIND_CONFIG` and the platform
/// default. Environment overrides apply on top of the file.
pub fn load(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::config_path().map_err(CliError::usage)?,
    };
    let mut config = Config::load_from(&path).map_err(CliError::usage)?;
    config
        .apply_env(|key| std::env::var(key).ok())
        .map_err(CliError::usage)?;
    Ok((config, path))
}

/// Print the effective configuration, or just its location.
pub fn execute(config: &Config, path: &Path, path_only: bool) -> Result<()> {
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }
    let rendered = config.to_toml().map_err(CliError::internal)?;
    print!("{rendered}");
    Ok(())
}
