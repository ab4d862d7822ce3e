#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

fn config_dir() -> &'static Path {
    static CONFIG_DIR: OnceLock<TempDir> = OnceLock::new();
    CONFIG_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"))
        .path()
}

/// A `specfind` command isolated from the user's configuration and
/// environment overrides.
pub fn specfind_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("specfind"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("SPECFIND_CONFIG", config_dir().join("config.toml"));
    for key in [
        "SPECFIND_RELAY_URL",
        "SPECFIND_PROBE_TIMEOUT_MS",
        "SPECFIND_RELAY_TIMEOUT_MS",
        "SPECFIND_DEADLINE_MS",
        "SPECFIND_BATCH_WIDTH",
        "SPECFIND_OUTPUT_FORMAT",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}
