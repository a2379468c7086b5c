// crates/aws-api-gate-providers/src/transport.rs
// ============================================================================
// Module: AWS CLI Transport
// Description: Direct-call transport that drives the AWS CLI binary.
// Purpose: Execute one typed API operation with caller-supplied credentials.
// Dependencies: aws-api-gate-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! The transport hands the typed parameter map to the AWS CLI through
//! `--cli-input-json`, so no argument is re-quoted. The region, read timeout
//! and JSON output format are always explicit. Credentials travel only in
//! the child environment and any ambient profile selection is removed, so the
//! call runs with exactly the credentials the executor passed in. An outer
//! deadline of the read timeout plus a startup grace bounds the whole call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use aws_api_gate_core::ApiRequest;
use aws_api_gate_core::ApiResponse;
use aws_api_gate_core::ApiTransport;
use aws_api_gate_core::Credentials;
use aws_api_gate_core::TransportError;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::process::CliProcessConfig;
use crate::process::ProcessError;
use crate::process::ProcessOutput;
use crate::process::ProcessRequest;
use crate::process::run_cli;
use crate::runtime::block_on_with_runtime;
use crate::runtime::provider_runtime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default time allowed for CLI start-up on top of the read timeout.
pub const DEFAULT_STARTUP_GRACE: Duration = Duration::from_secs(5);
/// Environment variables that would override the supplied credentials.
const AMBIENT_CREDENTIAL_VARS: [&str; 3] =
    ["AWS_PROFILE", "AWS_DEFAULT_PROFILE", "AWS_SESSION_TOKEN"];
/// Prefix of AWS CLI service error lines.
const CLI_ERROR_PREFIX: &str = "An error occurred (";

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport that runs each API call as one AWS CLI invocation.
pub struct AwsCliTransport {
    /// Process settings.
    config: CliProcessConfig,
    /// Extra time allowed beyond the request read timeout.
    startup_grace: Duration,
    /// Runtime driving child processes.
    runtime: Runtime,
}

impl AwsCliTransport {
    /// Creates a transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when the runtime cannot start.
    pub fn new(config: CliProcessConfig) -> Result<Self, TransportError> {
        let runtime = provider_runtime().map_err(|err| TransportError::Io(err.to_string()))?;
        Ok(Self {
            config,
            startup_grace: DEFAULT_STARTUP_GRACE,
            runtime,
        })
    }

    /// Overrides the start-up grace period.
    #[must_use]
    pub const fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }
}

impl ApiTransport for AwsCliTransport {
    fn invoke(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        let process = ProcessRequest {
            args: cli_arguments(request)?,
            env: credential_env(credentials),
            env_remove: AMBIENT_CREDENTIAL_VARS.iter().map(|name| (*name).to_string()).collect(),
            timeout: request.read_timeout.saturating_add(self.startup_grace),
        };
        let config = self.config.clone();
        let output = block_on_with_runtime(&self.runtime, async move {
            run_cli(&config, process).await
        })
        .map_err(|err| TransportError::Io(err.to_string()))?;
        match output {
            Ok(output) => interpret_output(&output),
            Err(ProcessError::Timeout {
                ..
            }) => Err(TransportError::Timeout {
                timeout_ms: request.read_timeout.as_millis(),
            }),
            Err(err) => Err(TransportError::Io(err.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the AWS CLI argument vector for a request.
fn cli_arguments(request: &ApiRequest) -> Result<Vec<String>, TransportError> {
    let input = serde_json::to_string(&request.parameters)
        .map_err(|err| TransportError::Io(format!("failed to encode parameters: {err}")))?;
    let mut args = vec![
        request.service.clone(),
        request.operation.clone(),
        "--cli-input-json".to_string(),
        input,
        "--region".to_string(),
        request.region.clone(),
        "--cli-read-timeout".to_string(),
        read_timeout_secs(request.read_timeout).to_string(),
        "--output".to_string(),
        "json".to_string(),
    ];
    if let Some(max_results) = request.max_results {
        args.push("--max-items".to_string());
        args.push(max_results.to_string());
    }
    if let Some(query) = &request.query {
        args.push("--query".to_string());
        args.push(query.clone());
    }
    if let Some(endpoint) = &request.endpoint_url {
        args.push("--endpoint-url".to_string());
        args.push(endpoint.clone());
    }
    Ok(args)
}

/// Converts a read timeout to whole CLI seconds, never shortening it.
fn read_timeout_secs(timeout: Duration) -> u128 {
    timeout.as_millis().div_ceil(1000).max(1)
}

/// Builds the child environment carrying the credentials.
fn credential_env(credentials: &Credentials) -> Vec<(String, String)> {
    let mut env = vec![
        ("AWS_ACCESS_KEY_ID".to_string(), credentials.access_key_id.clone()),
        ("AWS_SECRET_ACCESS_KEY".to_string(), credentials.secret_access_key.clone()),
    ];
    if let Some(token) = &credentials.session_token {
        env.push(("AWS_SESSION_TOKEN".to_string(), token.clone()));
    }
    env
}

/// Turns CLI output into a payload or a service error.
fn interpret_output(output: &ProcessOutput) -> Result<ApiResponse, TransportError> {
    if !output.success() {
        let (code, message) = parse_cli_error(&output.stderr);
        return Err(TransportError::Service {
            code,
            message,
            status_code: None,
        });
    }
    let trimmed = output.stdout.trim();
    if trimmed.is_empty() {
        return Ok(ApiResponse {
            payload: Value::Object(serde_json::Map::new()),
        });
    }
    let payload = serde_json::from_str(trimmed)
        .map_err(|err| TransportError::Io(format!("invalid JSON from AWS CLI: {err}")))?;
    Ok(ApiResponse {
        payload,
    })
}

/// Extracts the service error code and message from CLI stderr.
///
/// The CLI reports service errors as
/// `An error occurred (Code) when calling the Op operation: message`.
fn parse_cli_error(stderr: &str) -> (Option<String>, String) {
    let trimmed = stderr.trim();
    let Some(start) = trimmed.find(CLI_ERROR_PREFIX) else {
        if trimmed.is_empty() {
            return (None, "AWS CLI exited without output".to_string());
        }
        return (None, trimmed.to_string());
    };
    let rest = &trimmed[start + CLI_ERROR_PREFIX.len() ..];
    let Some(end) = rest.find(')') else {
        return (None, trimmed.to_string());
    };
    let code = rest[.. end].trim();
    let message = rest[end ..].split_once(": ").map_or(trimmed, |(_, message)| message.trim());
    let code = (!code.is_empty()).then(|| code.to_string());
    (code, message.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
