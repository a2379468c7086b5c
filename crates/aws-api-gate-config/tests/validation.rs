//! Validation tests for aws-api-gate-config.
// crates/aws-api-gate-config/tests/validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Limits and cross-field rules for every config section.
// Purpose: Ensure invalid settings fail closed with actionable messages.
// =============================================================================

use std::path::PathBuf;

use aws_api_gate_config::AuditSinkKind;
use aws_api_gate_config::ConfigError;

mod common;

use common::config_from_toml;
use common::minimal_config;

type TestResult = Result<(), String>;

/// Assert that a validation result is an error containing a specific substring.
fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

#[test]
fn read_timeout_bounds_are_inclusive() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    for value in [100, 10_000, 300_000] {
        config.execution.read_timeout_ms = value;
        config.validate().map_err(|err| format!("{value}: {err}"))?;
    }
    config.execution.read_timeout_ms = 99;
    assert_invalid(config.validate(), "execution.read_timeout_ms must be between 100 and 300000")?;
    config.execution.read_timeout_ms = 300_001;
    assert_invalid(config.validate(), "execution.read_timeout_ms")
}

#[test]
fn absolute_working_dir_is_accepted() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.execution.working_dir = Some(PathBuf::from("/var/lib/aws-api-gate"));
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn relative_working_dir_is_rejected() -> TestResult {
    let config = config_from_toml("[execution]\nworking_dir = \"work\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "AWS_API_MCP_WORKING_DIR")
}

#[test]
fn empty_cli_path_is_rejected() -> TestResult {
    let config =
        config_from_toml("[execution]\ncli_path = \"\"\n").map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "execution.cli_path must be non-empty")
}

#[test]
fn output_bound_must_be_positive_and_limited() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.execution.max_output_bytes = 0;
    assert_invalid(config.validate(), "execution.max_output_bytes")?;
    config.execution.max_output_bytes = 64 * 1024 * 1024 + 1;
    assert_invalid(config.validate(), "execution.max_output_bytes")
}

// ============================================================================
// SECTION: AWS
// ============================================================================

#[test]
fn malformed_region_is_rejected() -> TestResult {
    let config = config_from_toml("[aws]\ndefault_region = \"Europe West\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "aws.default_region is not a region name")
}

#[test]
fn profile_names_are_checked() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.aws.profile = Some("dev ops".to_string());
    assert_invalid(config.validate(), "aws.profile must not contain whitespace")?;
    config.aws.profile = Some("p".repeat(129));
    assert_invalid(config.validate(), "aws.profile exceeds max length")?;
    config.aws.profile = Some("dev-ops".to_string());
    config.validate().map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Catalog and Audit
// ============================================================================

#[test]
fn catalog_path_component_limit_is_enforced() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.catalog.path = Some(PathBuf::from(format!("data/{}.json", "c".repeat(256))));
    assert_invalid(config.validate(), "catalog.path path component too long")
}

#[test]
fn file_audit_requires_a_path() -> TestResult {
    let config =
        config_from_toml("[audit]\nsink = \"file\"\n").map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "audit.path is required when audit.sink is file")
}

#[test]
fn audit_path_without_file_sink_is_rejected() -> TestResult {
    let config = config_from_toml("[audit]\nsink = \"stderr\"\npath = \"/tmp/audit.log\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "audit.path is only valid when audit.sink is file")
}

#[test]
fn file_audit_with_path_is_valid() -> TestResult {
    let config = config_from_toml("[audit]\nsink = \"file\"\npath = \"/tmp/audit.log\"\n")
        .map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::File {
        return Err("sink should parse as file".to_string());
    }
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn unknown_sink_is_a_parse_error() -> TestResult {
    match config_from_toml("[audit]\nsink = \"syslog\"\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        _ => Err("expected parse error".to_string()),
    }
}
