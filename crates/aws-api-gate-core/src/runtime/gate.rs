// crates/aws-api-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Command Gate
// Description: Caller-side orchestration of the full command pipeline.
// Purpose: Translate, validate, enforce read-only mode, and execute commands
//          with one audit record per call.
// Dependencies: crate::core, crate::interfaces, crate::runtime, serde
// ============================================================================

//! ## Overview
//! The gate is what a host calls with raw command text. It composes the
//! pipeline stages in order and turns every early exit into a user-facing
//! error response: parse and validation problems, read-only denials, missing
//! credentials. Successful commands return either the interpretation response
//! or the customization output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;

use crate::core::ir::IRTranslation;
use crate::core::models::AwsApiErrorResponse;
use crate::core::models::AwsCliAliasResponse;
use crate::core::models::CustomizationResponse;
use crate::core::models::ProgramInterpretationResponse;
use crate::core::models::ReadOnlyOperations;
use crate::interfaces::ApiTransport;
use crate::interfaces::CredentialError;
use crate::interfaces::CredentialProvider;
use crate::interfaces::CustomizationDriver;
use crate::interfaces::SchemaCatalog;
use crate::runtime::audit::AuditSink;
use crate::runtime::audit::CommandAuditEvent;
use crate::runtime::audit::CommandAuditEventParams;
use crate::runtime::audit::CommandOutcome;
use crate::runtime::audit::ExecutionStage;
use crate::runtime::executor::Executor;
use crate::runtime::policy::is_operation_read_only;
use crate::runtime::region::resolve_region;
use crate::runtime::translate::translate_cli_to_ir;
use crate::runtime::validator::validate_in_region;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Prefix for translation and validation errors.
const VALIDATION_ERROR_PREFIX: &str = "Error while validating the command";
/// Prefix for execution errors.
const EXECUTION_ERROR_PREFIX: &str = "Error while executing the command";
/// Message returned when read-only mode blocks a command.
pub const READ_ONLY_DENIED_MESSAGE: &str = "Execution of this operation is not allowed because read only mode is enabled. It can be disabled by setting the READ_OPERATIONS_ONLY environment variable to False.";
/// Message returned when no credentials are configured.
pub const NO_CREDENTIALS_MESSAGE: &str = "No AWS credentials found. Please configure your AWS credentials using 'aws configure' or set appropriate environment variables.";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGateConfig {
    /// Region used when the command does not determine one.
    pub default_region: String,
    /// Whether only read-only operations may run.
    pub read_only: bool,
}

/// Result of a gated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallOutcome {
    /// Direct-call interpretation.
    Interpretation(ProgramInterpretationResponse),
    /// Customization output.
    Customization(AwsCliAliasResponse),
    /// The call was rejected or failed.
    Error(AwsApiErrorResponse),
}

impl CallOutcome {
    /// Returns true for error outcomes.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Pipeline facts gathered for the audit record.
struct AuditFacts {
    /// Resolved SDK service name.
    service: Option<String>,
    /// Resolved SDK operation name.
    operation: Option<String>,
    /// Resolved region.
    region: Option<String>,
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Composes translation, validation, policy, and execution.
pub struct CommandGate<C, T, D, P> {
    /// Schema catalog.
    catalog: C,
    /// Executor for both dispatch paths.
    executor: Executor<T, D>,
    /// Credential provider for direct calls.
    credentials: P,
    /// Read-only allowlist; `None` blocks everything in read-only mode.
    read_only_operations: Option<ReadOnlyOperations>,
    /// Gate configuration.
    config: CommandGateConfig,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
}

impl<C, T, D, P> CommandGate<C, T, D, P>
where
    C: SchemaCatalog,
    T: ApiTransport,
    D: CustomizationDriver,
    P: CredentialProvider,
{
    /// Creates a gate, loading the read-only allowlist from the catalog.
    pub fn new(
        catalog: C,
        executor: Executor<T, D>,
        credentials: P,
        config: CommandGateConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let read_only_operations = Some(catalog.read_only_operations());
        Self {
            catalog,
            executor,
            credentials,
            read_only_operations,
            config,
            audit,
        }
    }

    /// Replaces the read-only allowlist.
    #[must_use]
    pub fn with_read_only_operations(mut self, table: Option<ReadOnlyOperations>) -> Self {
        self.read_only_operations = table;
        self
    }

    /// Runs a command through the full pipeline.
    pub fn call(&self, cli_command: &str, max_results: Option<u32>) -> CallOutcome {
        let ir = match translate_cli_to_ir(&self.catalog, cli_command) {
            Ok(ir) => ir,
            Err(err) => {
                self.record(
                    &AuditFacts::empty(),
                    ExecutionStage::Parsing,
                    CommandOutcome::Rejected,
                    None,
                    Some("parse_error"),
                );
                return error(format!("{VALIDATION_ERROR_PREFIX}: {err}"));
            }
        };
        let facts = AuditFacts::from_ir(&ir, &self.config.default_region);

        let region = resolve_region(&ir, &self.config.default_region);
        let validation = validate_in_region(&ir, &region);
        if validation.validation_failed() {
            self.record(
                &facts,
                ExecutionStage::Validating,
                CommandOutcome::Rejected,
                None,
                Some("validation_failed"),
            );
            let rendered =
                serde_json::to_string(&validation).unwrap_or_else(|err| err.to_string());
            return error(format!("{VALIDATION_ERROR_PREFIX}: {rendered}"));
        }

        if self.config.read_only {
            let allowed = match &self.read_only_operations {
                None => false,
                Some(table) => match is_operation_read_only(&ir, table) {
                    Ok(allowed) => allowed,
                    Err(err) => {
                        self.record(
                            &facts,
                            ExecutionStage::Validating,
                            CommandOutcome::Rejected,
                            None,
                            Some("policy_error"),
                        );
                        return error(format!("{VALIDATION_ERROR_PREFIX}: {err}"));
                    }
                },
            };
            if !allowed {
                self.record(
                    &facts,
                    ExecutionStage::Validating,
                    CommandOutcome::Denied,
                    None,
                    Some("read_only"),
                );
                return error(READ_ONLY_DENIED_MESSAGE);
            }
        }

        if ir.is_customization {
            return match self.executor.execute_customization(cli_command) {
                CustomizationResponse::Output(output) => {
                    self.record(
                        &facts,
                        ExecutionStage::Terminal,
                        CommandOutcome::Executed,
                        None,
                        None,
                    );
                    CallOutcome::Customization(output)
                }
                CustomizationResponse::Error(failure) => {
                    self.record(
                        &facts,
                        ExecutionStage::Customization,
                        CommandOutcome::Failed,
                        None,
                        Some("driver_error"),
                    );
                    CallOutcome::Error(failure)
                }
            };
        }

        let credentials = match self.credentials.get_local_credentials() {
            Ok(credentials) => credentials,
            Err(err) => {
                self.record(
                    &facts,
                    ExecutionStage::DirectCall,
                    CommandOutcome::Failed,
                    None,
                    Some("no_credentials"),
                );
                return match err {
                    CredentialError::NoCredentials => {
                        error(format!("{EXECUTION_ERROR_PREFIX}: {NO_CREDENTIALS_MESSAGE}"))
                    }
                    CredentialError::Provider(_) => {
                        error(format!("{EXECUTION_ERROR_PREFIX}: {err}"))
                    }
                };
            }
        };

        let response = self.executor.interpret_ir(
            &ir,
            &credentials,
            &self.config.default_region,
            max_results,
        );
        let status_code = response.response.as_ref().map(|response| response.status_code);
        let (outcome, error_kind) = match status_code {
            Some(200) => (CommandOutcome::Executed, None),
            Some(_) => (CommandOutcome::Failed, Some("service_error")),
            None => (CommandOutcome::Rejected, Some("validation_failed")),
        };
        self.record(&facts, ExecutionStage::Terminal, outcome, status_code, error_kind);
        CallOutcome::Interpretation(response)
    }

    /// Emits one audit record.
    fn record(
        &self,
        facts: &AuditFacts,
        stage: ExecutionStage,
        outcome: CommandOutcome,
        status_code: Option<u16>,
        error_kind: Option<&'static str>,
    ) {
        self.audit.record(&CommandAuditEvent::new(CommandAuditEventParams {
            service: facts.service.clone(),
            operation: facts.operation.clone(),
            region: facts.region.clone(),
            stage,
            outcome,
            status_code,
            error_kind,
            read_only: self.config.read_only,
        }));
    }
}

impl AuditFacts {
    /// Facts for a command that did not translate.
    const fn empty() -> Self {
        Self {
            service: None,
            operation: None,
            region: None,
        }
    }

    /// Facts for a translated command.
    fn from_ir(ir: &IRTranslation, default_region: &str) -> Self {
        let metadata = ir.command_metadata.as_ref();
        Self {
            service: metadata.map(|metadata| metadata.service_sdk_name.clone()),
            operation: metadata.map(|metadata| metadata.operation_sdk_name.clone()),
            region: Some(resolve_region(ir, default_region)),
        }
    }
}

/// Builds an error outcome.
fn error(detail: impl Into<String>) -> CallOutcome {
    CallOutcome::Error(AwsApiErrorResponse::new(detail))
}
