// crates/aws-api-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: AWS API Gate Interfaces
// Description: Boundary traits for schemas, credentials, transport, and drivers.
// Purpose: Define the contract surfaces the pipeline depends on.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The pipeline never talks to AWS directly. Schema lookups, credential
//! acquisition, the direct API call, and the customization driver are all
//! reached through these traits so the core stays backend-agnostic and can be
//! exercised with in-memory fakes. Implementations must fail closed on
//! missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::catalog::CustomizationSchema;
use crate::core::catalog::OperationSchema;
use crate::core::catalog::ServiceSchema;
use crate::core::models::Credentials;
use crate::core::models::ReadOnlyOperations;

// ============================================================================
// SECTION: Schema Catalog
// ============================================================================

/// Read-only lookup over the AWS API surface.
pub trait SchemaCatalog {
    /// Looks up a service by CLI token.
    fn service(&self, token: &str) -> Option<&ServiceSchema>;

    /// Looks up an operation of a service by CLI tokens.
    fn operation(&self, service: &str, operation: &str) -> Option<Arc<OperationSchema>>;

    /// Looks up the customization namespace for a CLI token.
    fn customization(&self, service: &str) -> Option<&CustomizationSchema>;

    /// Builds the read-only allowlist for the policy gate.
    fn read_only_operations(&self) -> ReadOnlyOperations;
}

// ============================================================================
// SECTION: Credential Provider
// ============================================================================

/// Credential acquisition errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The provider chain produced no credentials.
    #[error("Unable to locate credentials")]
    NoCredentials,
    /// The provider failed for another reason.
    #[error("credential provider error: {0}")]
    Provider(String),
}

/// Supplies credentials for direct API calls.
pub trait CredentialProvider {
    /// Returns credentials from the local provider chain.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoCredentials`] when none are configured.
    fn get_local_credentials(&self) -> Result<Credentials, CredentialError>;
}

// ============================================================================
// SECTION: API Transport
// ============================================================================

/// A single direct API call assembled from a validated command.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// CLI service namespace (`s3api`).
    pub service: String,
    /// CLI operation name (`list-buckets`).
    pub operation: String,
    /// SDK service name (`s3`).
    pub service_sdk_name: String,
    /// SDK operation name (`ListBuckets`).
    pub operation_sdk_name: String,
    /// Typed parameters keyed by canonical name.
    pub parameters: Map<String, Value>,
    /// Region the call targets.
    pub region: String,
    /// Per-request read timeout.
    pub read_timeout: Duration,
    /// Result limit; set only for paginated operations.
    pub max_results: Option<u32>,
    /// Client-side filter expression.
    pub query: Option<String>,
    /// Endpoint override.
    pub endpoint_url: Option<String>,
}

/// Payload returned by a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Structured response payload.
    pub payload: Value,
}

/// Status reported when a service error carries none.
const DEFAULT_SERVICE_ERROR_STATUS: u16 = 400;

/// Direct-call failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service rejected the call.
    #[error("{message}")]
    Service {
        /// Service error code (`AccessDenied`).
        code: Option<String>,
        /// Error message.
        message: String,
        /// Reported HTTP status.
        status_code: Option<u16>,
    },
    /// The call did not complete within its timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u128,
    },
    /// The call could not be performed.
    #[error("transport error: {0}")]
    Io(String),
}

impl TransportError {
    /// Maps the failure to the status code reported to the caller.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Service {
                status_code,
                ..
            } => status_code.unwrap_or(DEFAULT_SERVICE_ERROR_STATUS),
            Self::Timeout {
                ..
            } => 408,
            Self::Io(_) => 500,
        }
    }

    /// Returns the service error code when one was reported.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Service {
                code,
                ..
            } => code.as_deref(),
            Self::Timeout {
                ..
            }
            | Self::Io(_) => None,
        }
    }
}

/// Performs direct API calls.
pub trait ApiTransport {
    /// Invokes one operation with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the call fails or times out.
    fn invoke(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError>;
}

// ============================================================================
// SECTION: Customization Driver
// ============================================================================

/// Captured output of a driver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Customization driver failures.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver raised while handling the arguments.
    #[error("{0}")]
    Failed(String),
    /// The driver process could not be started.
    #[error("failed to start driver: {0}")]
    Spawn(String),
    /// The driver did not finish in time.
    #[error("driver timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u128,
    },
    /// The driver produced more output than allowed.
    #[error("driver output exceeds size limit ({max_bytes} bytes)")]
    OutputTooLarge {
        /// Maximum captured bytes.
        max_bytes: usize,
    },
}

/// Runs client-side customization commands.
pub trait CustomizationDriver {
    /// Runs the argument vector (without the leading `aws`).
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the driver cannot run the command.
    fn run(&self, args: &[String]) -> Result<DriverOutput, DriverError>;
}

// ============================================================================
// SECTION: Shared References
// ============================================================================

impl<T: SchemaCatalog + ?Sized> SchemaCatalog for &T {
    fn service(&self, token: &str) -> Option<&ServiceSchema> {
        (**self).service(token)
    }

    fn operation(&self, service: &str, operation: &str) -> Option<Arc<OperationSchema>> {
        (**self).operation(service, operation)
    }

    fn customization(&self, service: &str) -> Option<&CustomizationSchema> {
        (**self).customization(service)
    }

    fn read_only_operations(&self) -> ReadOnlyOperations {
        (**self).read_only_operations()
    }
}

impl<T: ApiTransport + ?Sized> ApiTransport for Arc<T> {
    fn invoke(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        (**self).invoke(request, credentials)
    }
}

impl<T: CustomizationDriver + ?Sized> CustomizationDriver for Arc<T> {
    fn run(&self, args: &[String]) -> Result<DriverOutput, DriverError> {
        (**self).run(args)
    }
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn get_local_credentials(&self) -> Result<Credentials, CredentialError> {
        (**self).get_local_credentials()
    }
}
