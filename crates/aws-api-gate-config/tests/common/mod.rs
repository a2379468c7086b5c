// crates/aws-api-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config loading and validation tests.
// Purpose: Reduce duplication across integration tests for aws-api-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::HashMap;
use std::path::PathBuf;

use aws_api_gate_config::AwsApiGateConfig;
use aws_api_gate_config::ConfigError;
use tempfile::TempDir;

/// Parses a TOML string into an `AwsApiGateConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<AwsApiGateConfig, ConfigError> {
    AwsApiGateConfig::from_toml_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<AwsApiGateConfig, ConfigError> {
    config_from_toml("")
}

/// Writes a config file into a fresh temporary directory.
pub fn write_config(contents: &[u8]) -> Result<(TempDir, PathBuf), String> {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("aws-api-gate.toml");
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Builds an environment lookup from fixed pairs.
pub fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
    move |name| map.get(name).cloned()
}

/// Environment lookup with nothing set.
pub fn no_env(_name: &str) -> Option<String> {
    None
}
