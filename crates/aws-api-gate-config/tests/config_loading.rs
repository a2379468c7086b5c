//! Config loading tests for aws-api-gate-config.
// crates/aws-api-gate-config/tests/config_loading.rs
// =============================================================================
// Module: Config Loading Tests
// Description: File resolution, size limits, and environment overrides.
// Purpose: Ensure config layering behaves as documented and fails closed.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use aws_api_gate_config::AuditSinkKind;
use aws_api_gate_config::AwsApiGateConfig;
use aws_api_gate_config::CONFIG_ENV_VAR;
use aws_api_gate_config::ConfigError;
use aws_api_gate_config::READ_ONLY_ENV_VAR;
use aws_api_gate_config::REGION_ENV_VAR;
use aws_api_gate_config::WORKING_DIR_ENV_VAR;

mod common;

use common::env_of;
use common::minimal_config;
use common::no_env;
use common::write_config;

type TestResult = Result<(), String>;

/// Assert that a load result is an error containing a specific substring.
fn assert_load_error(result: Result<AwsApiGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected load failure".to_string()),
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.execution.read_only {
        return Err("read-only mode should default to off".to_string());
    }
    if config.executor_config().read_timeout != Duration::from_secs(10) {
        return Err("read timeout should default to 10s".to_string());
    }
    if config.execution.cli_path != Path::new("aws") {
        return Err("cli path should default to aws".to_string());
    }
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("audit should default to stderr".to_string());
    }
    Ok(())
}

#[test]
fn explicit_file_is_loaded_and_recorded() -> TestResult {
    let (_dir, path) = write_config(
        br#"
[aws]
default_region = "eu-west-1"
profile = "readonly"

[execution]
read_only = true
read_timeout_ms = 2500

[audit]
sink = "none"
"#,
    )?;
    let config =
        AwsApiGateConfig::load_with_env(Some(&path), no_env).map_err(|err| err.to_string())?;
    if config.source.as_deref() != Some(path.as_path()) {
        return Err("source path should be recorded".to_string());
    }
    let gate = config.gate_config().map_err(|err| err.to_string())?;
    if gate.default_region != "eu-west-1" || !gate.read_only {
        return Err("unexpected gate config".to_string());
    }
    let executor = config.executor_config();
    if executor.read_timeout != Duration::from_millis(2500)
        || executor.profile_name.as_deref() != Some("readonly")
    {
        return Err("unexpected executor config".to_string());
    }
    Ok(())
}

#[test]
fn config_path_comes_from_env_when_not_explicit() -> TestResult {
    let (_dir, path) = write_config(b"[aws]\ndefault_region = \"ca-central-1\"\n")?;
    let path_text = path.to_string_lossy().into_owned();
    let config =
        AwsApiGateConfig::load_with_env(None, env_of(&[(CONFIG_ENV_VAR, path_text.as_str())]))
            .map_err(|err| err.to_string())?;
    if config.aws.default_region.as_deref() != Some("ca-central-1") {
        return Err("env-selected file should be loaded".to_string());
    }
    Ok(())
}

#[test]
fn explicit_missing_file_fails() -> TestResult {
    let (dir, _path) = write_config(b"")?;
    let missing = dir.path().join("missing.toml");
    assert_load_error(AwsApiGateConfig::load_with_env(Some(&missing), no_env), "config io error")
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let mut contents = b"# padding\n".to_vec();
    contents.resize(1024 * 1024 + 1, b'#');
    let (_dir, path) = write_config(&contents)?;
    assert_load_error(AwsApiGateConfig::load_with_env(Some(&path), no_env), "exceeds size limit")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let (_dir, path) = write_config(&[0xff, 0xfe, 0x00])?;
    assert_load_error(AwsApiGateConfig::load_with_env(Some(&path), no_env), "must be utf-8")
}

#[test]
fn malformed_toml_is_a_parse_error() -> TestResult {
    let (_dir, path) = write_config(b"[execution\nread_only = true")?;
    assert_load_error(AwsApiGateConfig::load_with_env(Some(&path), no_env), "config parse error")
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

#[test]
fn env_overrides_file_values() -> TestResult {
    let (_dir, path) = write_config(
        b"[aws]\ndefault_region = \"us-west-2\"\n[execution]\nread_only = false\n",
    )?;
    let env = env_of(&[(REGION_ENV_VAR, "eu-north-1"), (READ_ONLY_ENV_VAR, "True")]);
    let config = AwsApiGateConfig::load_with_env(Some(&path), env).map_err(|err| err.to_string())?;
    if config.aws.default_region.as_deref() != Some("eu-north-1") {
        return Err("AWS_REGION should override the file".to_string());
    }
    if !config.execution.read_only {
        return Err("READ_OPERATIONS_ONLY should override the file".to_string());
    }
    Ok(())
}

#[test]
fn relative_working_dir_from_env_is_rejected() -> TestResult {
    let (_dir, path) = write_config(b"")?;
    let env = env_of(&[(WORKING_DIR_ENV_VAR, "relative/dir")]);
    assert_load_error(
        AwsApiGateConfig::load_with_env(Some(&path), env),
        "execution.working_dir must be an absolute path",
    )
}

#[test]
fn invalid_read_only_flag_is_rejected() -> TestResult {
    let (_dir, path) = write_config(b"")?;
    let env = env_of(&[(READ_ONLY_ENV_VAR, "sometimes")]);
    assert_load_error(
        AwsApiGateConfig::load_with_env(Some(&path), env),
        "READ_OPERATIONS_ONLY must be true or false",
    )
}

#[test]
fn missing_region_is_reported_only_when_required() -> TestResult {
    let (_dir, path) = write_config(b"")?;
    let config =
        AwsApiGateConfig::load_with_env(Some(&path), no_env).map_err(|err| err.to_string())?;
    match config.gate_config() {
        Err(err) if err.to_string().contains("AWS_REGION environment variable is not defined") => {
            Ok(())
        }
        _ => Err("expected missing region error".to_string()),
    }
}

#[test]
fn working_dir_is_created_on_demand() -> TestResult {
    let (dir, path) = write_config(b"")?;
    let target = dir.path().join("work").join("nested");
    let target_text = target.to_string_lossy().into_owned();
    let env = env_of(&[(WORKING_DIR_ENV_VAR, target_text.as_str())]);
    let config = AwsApiGateConfig::load_with_env(Some(&path), env).map_err(|err| err.to_string())?;
    let created = config.ensure_working_dir().map_err(|err| err.to_string())?;
    if created != Some(target.as_path()) || !target.is_dir() {
        return Err("working directory should exist after ensure_working_dir".to_string());
    }
    Ok(())
}
