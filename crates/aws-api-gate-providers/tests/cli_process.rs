// crates/aws-api-gate-providers/tests/cli_process.rs
// ============================================================================
// Module: AWS CLI Process Tests
// Description: Transport and driver behavior against a scripted fake CLI.
// ============================================================================
//! ## Overview
//! Replaces the AWS CLI with small shell scripts to verify argument and
//! environment handling, error mapping, deadlines, and output limits.

#![cfg(unix)]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs::File;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use aws_api_gate_core::ApiRequest;
use aws_api_gate_core::ApiTransport;
use aws_api_gate_core::Credentials;
use aws_api_gate_core::CustomizationDriver;
use aws_api_gate_core::DriverError;
use aws_api_gate_core::TransportError;
use aws_api_gate_providers::AwsCliDriver;
use aws_api_gate_providers::AwsCliTransport;
use aws_api_gate_providers::CliProcessConfig;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("aws");
    let mut file = File::create(&path).unwrap();
    file.write_all(format!("#!/bin/sh\n{body}\n").as_bytes()).unwrap();
    file.sync_all().unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config(dir: &TempDir, body: &str) -> CliProcessConfig {
    CliProcessConfig {
        cli_path: fake_cli(dir.path(), body),
        working_dir: Some(dir.path().to_path_buf()),
        max_output_bytes: 1024,
    }
}

fn request(read_timeout: Duration) -> ApiRequest {
    ApiRequest {
        service: "sts".to_string(),
        operation: "get-caller-identity".to_string(),
        service_sdk_name: "sts".to_string(),
        operation_sdk_name: "GetCallerIdentity".to_string(),
        parameters: serde_json::Map::new(),
        region: "us-east-1".to_string(),
        read_timeout,
        max_results: None,
        query: None,
        endpoint_url: None,
    }
}

fn credentials() -> Credentials {
    Credentials {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "secret".to_string(),
        session_token: None,
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

#[test]
fn transport_runs_with_supplied_credentials_only() {
    let dir = TempDir::new().unwrap();
    let transport = AwsCliTransport::new(config(
        &dir,
        r#"printf '{"Args":"%s %s","Key":"%s","Profile":"%s"}' "$1" "$2" "$AWS_ACCESS_KEY_ID" "${AWS_PROFILE:-none}""#,
    ))
    .unwrap();
    let response = transport.invoke(&request(Duration::from_secs(5)), &credentials()).unwrap();
    assert_eq!(
        response.payload,
        json!({ "Args": "sts get-caller-identity", "Key": "AKIDEXAMPLE", "Profile": "none" })
    );
}

#[test]
fn transport_maps_cli_errors_to_service_errors() {
    let dir = TempDir::new().unwrap();
    let transport = AwsCliTransport::new(config(
        &dir,
        "echo 'An error occurred (AccessDenied) when calling the GetCallerIdentity operation: \
         denied' >&2\nexit 254",
    ))
    .unwrap();
    let err = transport.invoke(&request(Duration::from_secs(5)), &credentials()).unwrap_err();
    assert_eq!(err.error_code(), Some("AccessDenied"));
    assert_eq!(err.to_string(), "denied");
}

#[test]
fn transport_enforces_the_deadline() {
    let dir = TempDir::new().unwrap();
    let transport = AwsCliTransport::new(config(&dir, "exec sleep 5"))
        .unwrap()
        .with_startup_grace(Duration::ZERO);
    let err = transport.invoke(&request(Duration::from_millis(200)), &credentials()).unwrap_err();
    assert!(matches!(err, TransportError::Timeout { timeout_ms: 200 }));
    assert_eq!(err.status_code(), 408);
}

// ============================================================================
// SECTION: Driver
// ============================================================================

#[test]
fn driver_returns_streams_for_failing_commands() {
    let dir = TempDir::new().unwrap();
    let driver = AwsCliDriver::new(config(&dir, "echo \"out $1 $2\"\necho err >&2\nexit 3")).unwrap();
    let output = driver.run(&["s3".to_string(), "ls".to_string()]).unwrap();
    assert_eq!(output.stdout, "out s3 ls\n");
    assert_eq!(output.stderr, "err\n");
}

#[test]
fn driver_runs_in_the_working_directory() {
    let dir = TempDir::new().unwrap();
    let driver = AwsCliDriver::new(config(&dir, "pwd")).unwrap();
    let output = driver.run(&[]).unwrap();
    let name = dir.path().file_name().unwrap().to_str().unwrap();
    assert!(output.stdout.trim_end().ends_with(name), "{}", output.stdout);
}

#[test]
fn driver_rejects_oversized_output() {
    let dir = TempDir::new().unwrap();
    let driver = AwsCliDriver::new(config(&dir, "printf '%04096d' 0")).unwrap();
    let err = driver.run(&[]).unwrap_err();
    assert!(matches!(err, DriverError::OutputTooLarge { max_bytes: 1024 }));
}

#[test]
fn driver_reports_missing_binaries() {
    let dir = TempDir::new().unwrap();
    let driver = AwsCliDriver::new(CliProcessConfig {
        cli_path: dir.path().join("missing-aws"),
        working_dir: None,
        max_output_bytes: 1024,
    })
    .unwrap();
    let err = driver.run(&["s3".to_string(), "ls".to_string()]).unwrap_err();
    assert!(matches!(err, DriverError::Spawn(_)));
}

#[test]
fn driver_enforces_its_deadline() {
    let dir = TempDir::new().unwrap();
    let driver = AwsCliDriver::new(config(&dir, "exec sleep 5"))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = driver.run(&[]).unwrap_err();
    assert!(matches!(err, DriverError::Timeout { timeout_ms: 200 }));
}
