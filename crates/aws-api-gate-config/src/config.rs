// crates/aws-api-gate-config/src/config.rs
// ============================================================================
// Module: AWS API Gate Configuration
// Description: Configuration loading, environment overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: aws-api-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is resolved in three layers: built-in defaults, an optional
//! TOML file, then environment overrides. The file path comes from the caller,
//! else `AWS_API_GATE_CONFIG`, else `aws-api-gate.toml` when that file exists.
//! The merged result is validated once; invalid settings fail closed.
//! Security posture: config inputs and environment values are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use aws_api_gate_core::runtime::CommandGateConfig;
use aws_api_gate_core::runtime::ExecutorConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "aws-api-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "AWS_API_GATE_CONFIG";
/// Environment variable carrying the default region.
pub const REGION_ENV_VAR: &str = "AWS_REGION";
/// Environment variable carrying the pinned profile.
pub const PROFILE_ENV_VAR: &str = "AWS_API_MCP_PROFILE_NAME";
/// Environment variable toggling read-only mode.
pub const READ_ONLY_ENV_VAR: &str = "READ_OPERATIONS_ONLY";
/// Environment variable carrying the customization working directory.
pub const WORKING_DIR_ENV_VAR: &str = "AWS_API_MCP_WORKING_DIR";
/// Environment variable overriding the AWS CLI binary path.
pub const CLI_PATH_ENV_VAR: &str = "AWS_API_GATE_CLI_PATH";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a region name.
pub(crate) const MAX_REGION_LENGTH: usize = 64;
/// Maximum length of a profile name.
pub(crate) const MAX_PROFILE_LENGTH: usize = 128;
/// Default read timeout in milliseconds.
pub(crate) const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
/// Minimum read timeout in milliseconds.
pub(crate) const MIN_READ_TIMEOUT_MS: u64 = 100;
/// Maximum read timeout in milliseconds.
pub(crate) const MAX_READ_TIMEOUT_MS: u64 = 300_000;
/// Default AWS CLI binary.
pub(crate) const DEFAULT_CLI_PATH: &str = "aws";
/// Default bound on captured child output in bytes.
pub(crate) const DEFAULT_MAX_OUTPUT_BYTES: usize = 8 * 1024 * 1024;
/// Maximum bound on captured child output in bytes.
pub(crate) const MAX_OUTPUT_BYTES_LIMIT: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// AWS API Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsApiGateConfig {
    /// AWS account and region settings.
    #[serde(default)]
    pub aws: AwsSettings,
    /// Execution settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Schema catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Audit settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// File the configuration was loaded from, if any (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AwsApiGateConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| env::var(name).ok())
    }

    /// Loads configuration with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::from_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without applying overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Reads and parses a config file under the size and path limits.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies environment overrides on top of file values.
    ///
    /// Blank variables are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };
        if let Some(region) = read(REGION_ENV_VAR) {
            self.aws.default_region = Some(region);
        }
        if let Some(profile) = read(PROFILE_ENV_VAR) {
            self.aws.profile = Some(profile);
        }
        if let Some(flag) = read(READ_ONLY_ENV_VAR) {
            self.execution.read_only = parse_bool(READ_ONLY_ENV_VAR, &flag)?;
        }
        if let Some(dir) = read(WORKING_DIR_ENV_VAR) {
            self.execution.working_dir = Some(PathBuf::from(dir));
        }
        if let Some(cli_path) = read(CLI_PATH_ENV_VAR) {
            self.execution.cli_path = PathBuf::from(cli_path);
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aws.validate()?;
        self.execution.validate()?;
        self.catalog.validate()?;
        self.audit.validate()
    }

    /// Returns the default region, which direct calls require.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no region is configured.
    pub fn require_default_region(&self) -> Result<&str, ConfigError> {
        self.aws.default_region.as_deref().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{REGION_ENV_VAR} environment variable is not defined and aws.default_region is \
                 not set"
            ))
        })
    }

    /// Builds the executor configuration.
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            read_timeout: Duration::from_millis(self.execution.read_timeout_ms),
            profile_name: self.aws.profile.clone(),
        }
    }

    /// Builds the command gate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no default region is configured.
    pub fn gate_config(&self) -> Result<CommandGateConfig, ConfigError> {
        Ok(CommandGateConfig {
            default_region: self.require_default_region()?.to_string(),
            read_only: self.execution.read_only,
        })
    }

    /// Creates the working directory when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the directory cannot be created.
    pub fn ensure_working_dir(&self) -> Result<Option<&Path>, ConfigError> {
        let Some(dir) = self.execution.working_dir.as_deref() else {
            return Ok(None);
        };
        fs::create_dir_all(dir).map_err(|err| {
            ConfigError::Io(format!("failed to create {}: {err}", dir.display()))
        })?;
        Ok(Some(dir))
    }
}

/// AWS account and region settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Region used when a command does not determine one.
    #[serde(default)]
    pub default_region: Option<String>,
    /// Named profile for credentials and customization commands.
    #[serde(default)]
    pub profile: Option<String>,
}

impl AwsSettings {
    /// Validates region and profile names.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(region) = &self.default_region {
            validate_region(region)?;
        }
        if let Some(profile) = &self.profile {
            if profile.trim().is_empty() {
                return Err(ConfigError::Invalid("aws.profile must be non-empty".to_string()));
            }
            if profile.len() > MAX_PROFILE_LENGTH {
                return Err(ConfigError::Invalid("aws.profile exceeds max length".to_string()));
            }
            if profile.chars().any(|ch| ch.is_control() || ch.is_whitespace()) {
                return Err(ConfigError::Invalid(
                    "aws.profile must not contain whitespace or control characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Only read-only operations may run.
    #[serde(default)]
    pub read_only: bool,
    /// Read timeout for direct calls in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Absolute working directory for customization commands.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// AWS CLI binary used by the transport and the driver.
    #[serde(default = "default_cli_path")]
    pub cli_path: PathBuf,
    /// Bound on captured child output in bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            read_timeout_ms: default_read_timeout_ms(),
            working_dir: None,
            cli_path: default_cli_path(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl ExecutionConfig {
    /// Validates execution limits and paths.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_READ_TIMEOUT_MS ..= MAX_READ_TIMEOUT_MS).contains(&self.read_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "execution.read_timeout_ms must be between {MIN_READ_TIMEOUT_MS} and \
                 {MAX_READ_TIMEOUT_MS}"
            )));
        }
        if let Some(dir) = &self.working_dir {
            validate_path_string("execution.working_dir", &dir.to_string_lossy())?;
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "execution.working_dir must be an absolute path (set via \
                     {WORKING_DIR_ENV_VAR})"
                )));
            }
        }
        validate_path_string("execution.cli_path", &self.cli_path.to_string_lossy())?;
        if self.max_output_bytes == 0 || self.max_output_bytes > MAX_OUTPUT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "execution.max_output_bytes must be between 1 and {MAX_OUTPUT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Schema catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog data file; the built-in catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Validates the catalog path.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("catalog.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit disabled.
    None,
}

/// Audit settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Sink receiving command audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates sink and path consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink is file".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink is file".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading config.
    #[error("config io error: {0}")]
    Io(String),
    /// Parse error for config contents.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Validation error for config contents.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from input, env override, or the default file.
///
/// The default file is optional; explicit and env-provided paths are not.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR).filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a region name such as `eu-west-1`.
fn validate_region(region: &str) -> Result<(), ConfigError> {
    if region.is_empty() {
        return Err(ConfigError::Invalid("aws.default_region must be non-empty".to_string()));
    }
    if region.len() > MAX_REGION_LENGTH {
        return Err(ConfigError::Invalid("aws.default_region exceeds max length".to_string()));
    }
    let well_formed = region
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
        && !region.starts_with('-')
        && !region.ends_with('-');
    if !well_formed {
        return Err(ConfigError::Invalid(format!(
            "aws.default_region is not a region name: {region}"
        )));
    }
    Ok(())
}

/// Parses a boolean environment value.
fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{name} must be true or false, found '{value}'"))),
    }
}

/// Default read timeout in milliseconds.
const fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Default AWS CLI binary path.
fn default_cli_path() -> PathBuf {
    PathBuf::from(DEFAULT_CLI_PATH)
}

/// Default output bound in bytes.
const fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool(READ_ONLY_ENV_VAR, "True").unwrap());
        assert!(parse_bool(READ_ONLY_ENV_VAR, "1").unwrap());
        assert!(!parse_bool(READ_ONLY_ENV_VAR, "FALSE").unwrap());
        assert!(!parse_bool(READ_ONLY_ENV_VAR, "off").unwrap());
        let err = parse_bool(READ_ONLY_ENV_VAR, "maybe").unwrap_err();
        assert!(err.to_string().contains("READ_OPERATIONS_ONLY must be true or false"));
    }

    #[test]
    fn validate_path_string_rejects_empty_and_long_values() {
        assert!(validate_path_string("catalog.path", "./catalog.json").is_ok());
        let empty = validate_path_string("catalog.path", "  ").unwrap_err();
        assert!(empty.to_string().contains("non-empty"));
        let long = "a".repeat(MAX_TOTAL_PATH_LENGTH + 1);
        let too_long = validate_path_string("catalog.path", &long).unwrap_err();
        assert!(too_long.to_string().contains("max length"));
        let component = format!("dir/{}", "b".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(
            validate_path_string("catalog.path", &component)
                .unwrap_err()
                .to_string()
                .contains("component too long")
        );
    }

    #[test]
    fn region_names_are_checked() {
        assert!(validate_region("eu-west-1").is_ok());
        assert!(validate_region("us-gov-west-1").is_ok());
        assert!(validate_region("EU-WEST-1").is_err());
        assert!(validate_region("-us-east-1").is_err());
        assert!(validate_region("us east 1").is_err());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AwsApiGateConfig::from_toml_str(
            r#"
            [aws]
            default_region = "us-west-2"
            profile = "file"

            [execution]
            read_only = false
            "#,
        )
        .unwrap();
        config
            .apply_env(env_of(&[
                (REGION_ENV_VAR, "eu-central-1"),
                (PROFILE_ENV_VAR, "ops"),
                (READ_ONLY_ENV_VAR, "true"),
                (WORKING_DIR_ENV_VAR, "/tmp/aws-api-gate"),
                (CLI_PATH_ENV_VAR, "/opt/aws/bin/aws"),
            ]))
            .unwrap();
        assert_eq!(config.aws.default_region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.aws.profile.as_deref(), Some("ops"));
        assert!(config.execution.read_only);
        assert_eq!(config.execution.working_dir, Some(PathBuf::from("/tmp/aws-api-gate")));
        assert_eq!(config.execution.cli_path, PathBuf::from("/opt/aws/bin/aws"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AwsApiGateConfig::default();
        config.apply_env(env_of(&[(REGION_ENV_VAR, "  "), (READ_ONLY_ENV_VAR, "")])).unwrap();
        assert!(config.aws.default_region.is_none());
        assert!(!config.execution.read_only);
    }

    #[test]
    fn executor_and_gate_configs_follow_settings() {
        let mut config = AwsApiGateConfig::default();
        config.aws.default_region = Some("ap-south-1".to_string());
        config.aws.profile = Some("ops".to_string());
        config.execution.read_timeout_ms = 2_500;
        config.execution.read_only = true;
        let executor = config.executor_config();
        assert_eq!(executor.read_timeout, Duration::from_millis(2_500));
        assert_eq!(executor.profile_name.as_deref(), Some("ops"));
        let gate = config.gate_config().unwrap();
        assert_eq!(gate.default_region, "ap-south-1");
        assert!(gate.read_only);
    }

    #[test]
    fn gate_config_requires_a_region() {
        let err = AwsApiGateConfig::default().gate_config().unwrap_err();
        assert!(err.to_string().contains("AWS_REGION environment variable is not defined"));
    }
}
