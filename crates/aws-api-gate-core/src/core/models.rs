// crates/aws-api-gate-core/src/core/models.rs
// ============================================================================
// Module: Interpretation Models
// Description: Result, failure, and credential types shared across the pipeline.
// Purpose: Provide stable, serializable shapes for every pipeline outcome.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! These types are what the pipeline hands back to its caller: validation
//! failures with their localizing context, interpretation responses from the
//! direct-call path, and the two shapes produced by the customization path.
//! Optional fields serialize as `null` so consumers always see the full shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::names::normalize_token;
use crate::core::names::pascal_to_kebab;

// ============================================================================
// SECTION: Command Metadata
// ============================================================================

/// Identifies the remote capability a command invokes.
///
/// # Invariants
/// - Empty `service_sdk_name` or `operation_sdk_name` marks an incomplete
///   translation; consumers must reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Canonical SDK service name (`s3`, `ec2`, `sts`).
    pub service_sdk_name: String,
    /// Human-readable service name (`AWS Cloud9`).
    pub service_full_sdk_name: String,
    /// Canonical SDK operation name (`GetCallerIdentity`).
    pub operation_sdk_name: String,
}

impl CommandMetadata {
    /// Returns true when both SDK names are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.service_sdk_name.trim().is_empty() && !self.operation_sdk_name.trim().is_empty()
    }
}

// ============================================================================
// SECTION: Validation Failures
// ============================================================================

/// Localizes a failure within the command that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Service token of the command.
    pub service: Option<String>,
    /// Operation token of the command.
    pub operation: Option<String>,
    /// Flags implicated in the failure, in command order.
    pub parameters: Option<Vec<String>>,
    /// Raw tokens implicated in the failure.
    pub args: Option<Vec<String>>,
    /// Region the command resolved to.
    pub region: Option<String>,
    /// Client-side filter expressions (`--query`).
    pub operators: Option<Vec<String>>,
}

impl Context {
    /// Builds a context that names only the service and operation.
    #[must_use]
    pub fn for_command(service: &str, operation: &str) -> Self {
        Self {
            service: Some(service.to_string()),
            operation: Some(operation.to_string()),
            ..Self::default()
        }
    }

    /// Returns the context with the implicated parameter flags set.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Returns the context with the implicated raw tokens set.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }
}

/// A single reportable problem with a command.
///
/// # Invariants
/// - `reason` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Human-readable failure message.
    pub reason: String,
    /// Location of the failure within the command.
    pub context: Option<Context>,
}

impl ValidationFailure {
    /// Creates a failure with an attached context.
    #[must_use]
    pub fn new(reason: impl Into<String>, context: Context) -> Self {
        Self {
            reason: reason.into(),
            context: Some(context),
        }
    }

    /// Creates a failure with an optional context.
    #[must_use]
    pub fn with_optional_context(reason: impl Into<String>, context: Option<Context>) -> Self {
        Self {
            reason: reason.into(),
            context,
        }
    }

    /// Creates a failure that cannot be tied to a command location.
    #[must_use]
    pub fn without_context(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            context: None,
        }
    }
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Short-lived or local AWS credentials supplied per invocation.
///
/// # Invariants
/// - Never persisted or logged; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Interpretation Responses
// ============================================================================

/// Resolved execution context surfaced with every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationMetadata {
    /// SDK service name.
    pub service: String,
    /// SDK operation name.
    pub operation: String,
    /// Region the command resolved to.
    pub region_name: String,
    /// Human-readable service name.
    pub service_full_name: String,
}

/// Outcome of a direct API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationResponse {
    /// Canonical JSON payload on success.
    pub json: Option<String>,
    /// Error message when the call failed.
    pub error: Option<String>,
    /// HTTP-style status code (200 on success).
    pub status_code: u16,
    /// Service error code when the service reported one.
    pub error_code: Option<String>,
    /// Continuation token when the result was truncated.
    pub pagination_token: Option<String>,
}

/// Top-level result of interpreting or validating a command.
///
/// # Invariants
/// - A terminal outcome populates either `response` or at least one failure list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInterpretationResponse {
    /// Direct-call response when the command executed.
    pub response: Option<InterpretationResponse>,
    /// Translation and constraint failures.
    pub validation_failures: Option<Vec<ValidationFailure>>,
    /// Required parameters that were never supplied.
    pub missing_context_failures: Option<Vec<ValidationFailure>>,
    /// Resolved execution context.
    pub metadata: Option<InterpretationMetadata>,
}

impl ProgramInterpretationResponse {
    /// Builds a response from failure lists, collapsing empty lists to `None`.
    #[must_use]
    pub fn from_failures(
        validation_failures: Vec<ValidationFailure>,
        missing_context_failures: Vec<ValidationFailure>,
    ) -> Self {
        Self {
            response: None,
            validation_failures: non_empty(validation_failures),
            missing_context_failures: non_empty(missing_context_failures),
            metadata: None,
        }
    }

    /// Returns true when either failure list is populated.
    #[must_use]
    pub fn validation_failed(&self) -> bool {
        self.validation_failures.as_ref().is_some_and(|list| !list.is_empty())
            || self.missing_context_failures.as_ref().is_some_and(|list| !list.is_empty())
    }
}

/// Collapses an empty list to `None`.
fn non_empty(list: Vec<ValidationFailure>) -> Option<Vec<ValidationFailure>> {
    if list.is_empty() { None } else { Some(list) }
}

// ============================================================================
// SECTION: Customization Responses
// ============================================================================

/// Captured output of a customization command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsCliAliasResponse {
    /// Captured standard output.
    pub response: String,
    /// Captured standard error.
    pub error: String,
}

/// Error shape returned when a command could not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsApiErrorResponse {
    /// Always true.
    pub error: bool,
    /// Failure detail.
    pub detail: String,
}

impl AwsApiErrorResponse {
    /// Creates an error response with the given detail.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            error: true,
            detail: detail.into(),
        }
    }
}

/// Either shape produced by the customization path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomizationResponse {
    /// Driver ran and its output was captured.
    Output(AwsCliAliasResponse),
    /// Driver failed.
    Error(AwsApiErrorResponse),
}

// ============================================================================
// SECTION: Read-Only Operations
// ============================================================================

/// Per-service allowlist of non-mutating operations.
///
/// Operation names are stored in CLI spelling; lookups accept either the CLI
/// or the SDK spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyOperations {
    /// Service SDK name to read-only operation names.
    services: BTreeMap<String, BTreeSet<String>>,
}

impl ReadOnlyOperations {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an operation of a service as read-only.
    pub fn insert(&mut self, service: &str, operation: &str) {
        self.services
            .entry(normalize_token(service))
            .or_default()
            .insert(pascal_to_kebab(operation.trim()));
    }

    /// Returns true when the operation is listed for the service.
    #[must_use]
    pub fn has(&self, service: &str, operation: &str) -> bool {
        self.services
            .get(&normalize_token(service))
            .is_some_and(|operations| operations.contains(&pascal_to_kebab(operation.trim())))
    }

    /// Returns true when the service has any entry.
    #[must_use]
    pub fn contains_service(&self, service: &str) -> bool {
        self.services.contains_key(&normalize_token(service))
    }

    /// Number of services in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true when the table has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
