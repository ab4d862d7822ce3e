//! Configuration management for specfind.
//!
//! Settings are read from a TOML file, then overridden by environment
//! variables, then (in the CLI) by command-line flags.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Built-in defaults**: 5s probes, 10s relay calls, batch width 5
//! 2. **Config file**: `$SPECFIND_CONFIG`, or the platform config directory
//! 3. **Environment variables**: `SPECFIND_*` prefix
//!
//! ## Example Configuration File
//!
//! ```toml
//! [probe]
//! timeout_ms = 5000
//! accept = "application/json, application/yaml, */*"
//!
//! [relay]
//! base_url = "http://localhost:3001/api"
//! timeout_ms = 10000
//!
//! [discovery]
//! batch_width = 5
//! deadline_ms = 60000
//!
//! [catalog]
//! extra_root_paths = ["/internal/openapi.json"]
//!
//! [tracking]
//! endpoint = "http://localhost:3001/api/track"
//! ```
//!
//! ## Loading
//!
//! ```rust
//! use specfind_core::Config;
//!
//! let config = Config::from_toml("[discovery]\nbatch_width = 8\n")?;
//! assert_eq!(config.discovery.batch_width, 8);
//! assert_eq!(config.probe.timeout_ms, 5000);
//! # Ok::<(), specfind_core::Error>(())
//! ```

use crate::discovery::{DEFAULT_BATCH_WIDTH, DiscoveryOptions};
use crate::probe::DEFAULT_ACCEPT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SPECFIND_CONFIG";

const RELAY_URL_ENV: &str = "SPECFIND_RELAY_URL";
const PROBE_TIMEOUT_ENV: &str = "SPECFIND_PROBE_TIMEOUT_MS";
const RELAY_TIMEOUT_ENV: &str = "SPECFIND_RELAY_TIMEOUT_MS";
const DEADLINE_ENV: &str = "SPECFIND_DEADLINE_MS";
const BATCH_WIDTH_ENV: &str = "SPECFIND_BATCH_WIDTH";

/// Largest accepted batch width.
pub const MAX_BATCH_WIDTH: usize = 32;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Direct probe settings.
    pub probe: ProbeConfig,
    /// Relay settings.
    pub relay: RelayConfig,
    /// Driver settings.
    pub discovery: DiscoveryConfig,
    /// Candidate catalog extensions.
    pub catalog: CatalogConfig,
    /// Visit tracking.
    pub tracking: TrackingConfig,
}

/// `[probe]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-candidate timeout in milliseconds.
    pub timeout_ms: u64,
    /// `Accept` header sent with direct probes.
    pub accept: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

/// `[relay]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Relay base URL; the relay is disabled when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Relay call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 10_000,
        }
    }
}

/// `[discovery]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Concurrency of the root and ancestor tiers.
    pub batch_width: usize,
    /// Overall deadline in milliseconds; unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            batch_width: DEFAULT_BATCH_WIDTH,
            deadline_ms: None,
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Extra absolute paths probed on the bare origin.
    pub extra_root_paths: Vec<String>,
}

/// `[tracking]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Visit logging endpoint; tracking is off when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or
    /// parsed, or if an environment override is malformed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from `path` without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid TOML or invalid values.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Serialize to pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))
    }

    /// Where the configuration file is read from.
    ///
    /// `$SPECFIND_CONFIG` when set, otherwise `config.toml` in the platform
    /// config directory:
    /// - Linux: `~/.config/specfind/config.toml`
    /// - macOS: `~/Library/Application Support/dev.specfind.specfind/config.toml`
    /// - Windows: `%APPDATA%\specfind\specfind\config\config.toml`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            if !explicit.is_empty() {
                return Ok(PathBuf::from(explicit));
            }
        }
        let project_dirs = directories::ProjectDirs::from("dev", "specfind", "specfind")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply `SPECFIND_*` overrides read through `lookup`.
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a numeric override does not parse.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(RELAY_URL_ENV) {
            self.relay.base_url = Some(url.trim().to_string());
        }
        if let Some(value) = get(PROBE_TIMEOUT_ENV) {
            self.probe.timeout_ms = parse_env(PROBE_TIMEOUT_ENV, &value)?;
        }
        if let Some(value) = get(RELAY_TIMEOUT_ENV) {
            self.relay.timeout_ms = parse_env(RELAY_TIMEOUT_ENV, &value)?;
        }
        if let Some(value) = get(DEADLINE_ENV) {
            self.discovery.deadline_ms = Some(parse_env(DEADLINE_ENV, &value)?);
        }
        if let Some(value) = get(BATCH_WIDTH_ENV) {
            self.discovery.batch_width = parse_env(BATCH_WIDTH_ENV, &value)?;
        }
        Ok(())
    }

    /// Driver options for this configuration.
    ///
    /// The batch width is clamped to `1..=32`.
    #[must_use]
    pub fn to_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            probe_timeout: Duration::from_millis(self.probe.timeout_ms),
            accept: self.probe.accept.clone(),
            relay_url: self.relay.base_url.clone(),
            relay_timeout: Duration::from_millis(self.relay.timeout_ms),
            batch_width: self.discovery.batch_width.clamp(1, MAX_BATCH_WIDTH),
            deadline: self.discovery.deadline_ms.map(Duration::from_millis),
            extra_root_paths: self.catalog.extra_root_paths.clone(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got '{value}'")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe.timeout_ms, 5_000);
        assert_eq!(config.relay.timeout_ms, 10_000);
        assert!(config.relay.base_url.is_none());
        assert_eq!(config.discovery.batch_width, 5);
        assert!(config.discovery.deadline_ms.is_none());
        assert!(config.tracking.endpoint.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Given a file that only sets the relay
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[relay]\nbase_url = \"http://localhost:3001/api\"\n").unwrap();

        // When loading it
        let config = Config::load_from(&path).unwrap();

        // Then everything else keeps its default
        assert_eq!(
            config.relay.base_url.as_deref(),
            Some("http://localhost:3001/api")
        );
        assert_eq!(config.relay.timeout_ms, 10_000);
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[probe\ntimeout_ms = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("Failed to parse config")));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = Config::from_toml("[discovery]\nbatch_width = \"wide\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rendered_toml_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.catalog.extra_root_paths = vec!["/internal/openapi.json".to_string()];
        config.tracking.endpoint = Some("http://localhost:3001/api/track".to_string());
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (RELAY_URL_ENV, " http://relay.local/api "),
                (PROBE_TIMEOUT_ENV, "750"),
                (RELAY_TIMEOUT_ENV, "1500"),
                (DEADLINE_ENV, "30000"),
                (BATCH_WIDTH_ENV, "8"),
            ]))
            .unwrap();

        assert_eq!(config.relay.base_url.as_deref(), Some("http://relay.local/api"));
        assert_eq!(config.probe.timeout_ms, 750);
        assert_eq!(config.relay.timeout_ms, 1500);
        assert_eq!(config.discovery.deadline_ms, Some(30_000));
        assert_eq!(config.discovery.batch_width, 8);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env(&[(RELAY_URL_ENV, "  "), (PROBE_TIMEOUT_ENV, "")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_env_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[(PROBE_TIMEOUT_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains(PROBE_TIMEOUT_ENV)));
    }

    #[test]
    fn test_to_options_clamps_batch_width() {
        let mut config = Config::default();
        config.discovery.batch_width = 0;
        assert_eq!(config.to_options().batch_width, 1);

        config.discovery.batch_width = 500;
        assert_eq!(config.to_options().batch_width, MAX_BATCH_WIDTH);
    }

    #[test]
    fn test_to_options_converts_durations() {
        let mut config = Config::default();
        config.discovery.deadline_ms = Some(2_500);
        let options = config.to_options();
        assert_eq!(options.probe_timeout, Duration::from_secs(5));
        assert_eq!(options.relay_timeout, Duration::from_secs(10));
        assert_eq!(options.deadline, Some(Duration::from_millis(2_500)));
        assert_eq!(options.accept, DEFAULT_ACCEPT);
    }
}
