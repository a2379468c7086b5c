// crates/aws-api-gate-providers/src/process.rs
// ============================================================================
// Module: AWS CLI Process Runner
// Description: Bounded child-process execution for the AWS CLI binary.
// Purpose: Share spawn, timeout, and output limits between transport and driver.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! Both the direct-call transport and the customization driver run the AWS
//! CLI as a child process. This module owns the mechanics: a closed stdin,
//! separately captured stdout and stderr with a hard byte limit, a deadline
//! after which the child is killed, and an environment that the caller
//! shapes explicitly.
//!
//! Security posture: child output is untrusted and size-limited; the child
//! is killed whenever its handle is dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default AWS CLI executable name.
pub const DEFAULT_CLI_PATH: &str = "aws";
/// Default limit on captured output per stream.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 8 * 1024 * 1024;

/// Settings shared by every AWS CLI invocation.
///
/// # Invariants
/// - `max_output_bytes` applies to stdout and stderr independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliProcessConfig {
    /// AWS CLI executable.
    pub cli_path: PathBuf,
    /// Working directory of the child process.
    pub working_dir: Option<PathBuf>,
    /// Maximum captured bytes per stream.
    pub max_output_bytes: usize,
}

impl Default for CliProcessConfig {
    fn default() -> Self {
        Self {
            cli_path: PathBuf::from(DEFAULT_CLI_PATH),
            working_dir: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// One child-process invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    /// Arguments after the executable.
    pub args: Vec<String>,
    /// Variables added to the child environment.
    pub env: Vec<(String, String)>,
    /// Variables removed from the child environment.
    pub env_remove: Vec<String>,
    /// Deadline for the whole invocation.
    pub timeout: Duration,
}

/// Captured result of a finished child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, when the child exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns true when the child exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Child-process failures.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started.
    #[error("failed to start {program}: {reason}")]
    Spawn {
        /// Executable that failed.
        program: String,
        /// Operating system error.
        reason: String,
    },
    /// The child did not finish before the deadline.
    #[error("process timed out after {timeout_ms} ms")]
    Timeout {
        /// Deadline in milliseconds.
        timeout_ms: u128,
    },
    /// A stream exceeded the output limit.
    #[error("process output exceeds size limit ({max_bytes} bytes)")]
    OutputTooLarge {
        /// Maximum captured bytes.
        max_bytes: usize,
    },
    /// Reading output or waiting for the child failed.
    #[error("process io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs the AWS CLI and captures its output.
///
/// # Errors
///
/// Returns [`ProcessError`] when the child cannot start, exceeds its deadline
/// or output limit, or its streams fail.
pub async fn run_cli(
    config: &CliProcessConfig,
    request: ProcessRequest,
) -> Result<ProcessOutput, ProcessError> {
    let mut command = Command::new(&config.cli_path);
    command
        .args(&request.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for name in &request.env_remove {
        command.env_remove(name);
    }
    command.envs(request.env.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    if let Some(dir) = &config.working_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|err| ProcessError::Spawn {
        program: config.cli_path.display().to_string(),
        reason: err.to_string(),
    })?;
    let stdout =
        child.stdout.take().ok_or_else(|| ProcessError::Io("stdout not captured".to_string()))?;
    let stderr =
        child.stderr.take().ok_or_else(|| ProcessError::Io("stderr not captured".to_string()))?;
    let limit = config.max_output_bytes;

    let finished = tokio::time::timeout(request.timeout, async move {
        let (stdout, stderr) =
            tokio::try_join!(read_bounded(stdout, limit), read_bounded(stderr, limit))?;
        let status = child.wait().await.map_err(|err| ProcessError::Io(err.to_string()))?;
        Ok::<_, ProcessError>(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    })
    .await;

    finished.unwrap_or_else(|_| {
        Err(ProcessError::Timeout {
            timeout_ms: request.timeout.as_millis(),
        })
    })
}

/// Reads a stream to the end, failing once it exceeds `limit` bytes.
async fn read_bounded<R>(reader: R, limit: usize) -> Result<String, ProcessError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    reader
        .take(cap)
        .read_to_end(&mut buffer)
        .await
        .map_err(|err| ProcessError::Io(err.to_string()))?;
    if buffer.len() > limit {
        return Err(ProcessError::OutputTooLarge {
            max_bytes: limit,
        });
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
