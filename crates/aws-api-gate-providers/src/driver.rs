// crates/aws-api-gate-providers/src/driver.rs
// ============================================================================
// Module: AWS CLI Customization Driver
// Description: Runs client-side customization commands through the AWS CLI.
// Purpose: Execute commands such as `s3 ls` that are not single API calls.
// Dependencies: aws-api-gate-core, tokio
// ============================================================================

//! ## Overview
//! Customizations are handed to the real AWS CLI with their original
//! argument vector. Standard output and standard error are captured
//! separately; a non-zero exit is not a driver failure, its diagnostics are
//! returned on the error stream like any other output. Only start-up
//! failures, timeouts and oversized output are driver errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use aws_api_gate_core::CustomizationDriver;
use aws_api_gate_core::DriverError;
use aws_api_gate_core::DriverOutput;
use tokio::runtime::Runtime;

use crate::process::CliProcessConfig;
use crate::process::ProcessError;
use crate::process::ProcessRequest;
use crate::process::run_cli;
use crate::runtime::block_on_with_runtime;
use crate::runtime::provider_runtime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default deadline for one customization command.
pub const DEFAULT_DRIVER_TIMEOUT: Duration = Duration::from_secs(300);

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Customization driver backed by the AWS CLI binary.
pub struct AwsCliDriver {
    /// Process settings.
    config: CliProcessConfig,
    /// Deadline per command.
    timeout: Duration,
    /// Runtime driving child processes.
    runtime: Runtime,
}

impl AwsCliDriver {
    /// Creates a driver with the default deadline.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Spawn`] when the runtime cannot start.
    pub fn new(config: CliProcessConfig) -> Result<Self, DriverError> {
        let runtime = provider_runtime().map_err(|err| DriverError::Spawn(err.to_string()))?;
        Ok(Self {
            config,
            timeout: DEFAULT_DRIVER_TIMEOUT,
            runtime,
        })
    }

    /// Overrides the per-command deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CustomizationDriver for AwsCliDriver {
    fn run(&self, args: &[String]) -> Result<DriverOutput, DriverError> {
        let config = self.config.clone();
        let request = ProcessRequest {
            args: args.to_vec(),
            timeout: self.timeout,
            ..ProcessRequest::default()
        };
        let output = block_on_with_runtime(&self.runtime, async move {
            run_cli(&config, request).await
        })
        .map_err(|err| DriverError::Spawn(err.to_string()))?;
        match output {
            Ok(output) => Ok(DriverOutput {
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            Err(ProcessError::Spawn {
                program,
                reason,
            }) => Err(DriverError::Spawn(format!("{program}: {reason}"))),
            Err(ProcessError::Timeout {
                timeout_ms,
            }) => Err(DriverError::Timeout {
                timeout_ms,
            }),
            Err(ProcessError::OutputTooLarge {
                max_bytes,
            }) => Err(DriverError::OutputTooLarge {
                max_bytes,
            }),
            Err(ProcessError::Io(reason)) => Err(DriverError::Failed(reason)),
        }
    }
}
