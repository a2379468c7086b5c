// crates/aws-api-gate-core/src/runtime/executor.rs
// ============================================================================
// Module: Command Executor
// Description: Dual dispatch of validated commands.
// Purpose: Run API commands through the transport and customizations through
//          the CLI driver, normalizing every outcome.
// Dependencies: crate::core, crate::interfaces, crate::runtime, serde_jcs
// ============================================================================

//! ## Overview
//! The executor moves a command through `Parsing -> Validating ->
//! (Customization | DirectCall) -> Terminal`. Direct calls carry the resolved
//! region, a bounded read timeout and caller-supplied credentials, and
//! their results are canonicalized JSON. Customization commands hand the
//! original argument vector to the driver, with the configured profile
//! appended unless the caller chose one. Execution failures are returned as
//! values, never raised.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::ir::IRTranslation;
use crate::core::models::AwsApiErrorResponse;
use crate::core::models::AwsCliAliasResponse;
use crate::core::models::CommandMetadata;
use crate::core::models::Credentials;
use crate::core::models::CustomizationResponse;
use crate::core::models::InterpretationMetadata;
use crate::core::models::InterpretationResponse;
use crate::core::models::ProgramInterpretationResponse;
use crate::core::models::ValidationFailure;
use crate::interfaces::ApiRequest;
use crate::interfaces::ApiTransport;
use crate::interfaces::CredentialError;
use crate::interfaces::CredentialProvider;
use crate::interfaces::CustomizationDriver;
use crate::interfaces::SchemaCatalog;
use crate::parser::parse_command;
use crate::runtime::region::resolve_region;
use crate::runtime::translate::translate_cli_to_ir;
use crate::runtime::validator::validate_in_region;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default per-request read timeout for direct calls.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Response key carrying a continuation token.
const PAGINATION_TOKEN_KEY: &str = "NextToken";

/// Executor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Read timeout applied to every direct call, regardless of region.
    pub read_timeout: Duration,
    /// Profile appended to customization commands.
    pub profile_name: Option<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            profile_name: None,
        }
    }
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of dispatching a translated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command went through the customization driver.
    Customization(CustomizationResponse),
    /// The command went through the direct-call path (or failed validation).
    DirectCall(ProgramInterpretationResponse),
}

/// Dispatch errors that are not reportable command outcomes.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The IR has no resolved metadata.
    #[error("translated command doesn't include service and operation name")]
    IncompleteTranslation,
    /// Credentials could not be acquired.
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Dispatches validated commands to the transport or the driver.
pub struct Executor<T, D> {
    /// Direct-call transport.
    transport: T,
    /// Customization driver.
    driver: D,
    /// Executor configuration.
    config: ExecutorConfig,
}

impl<T, D> Executor<T, D>
where
    T: ApiTransport,
    D: CustomizationDriver,
{
    /// Creates an executor.
    pub const fn new(transport: T, driver: D, config: ExecutorConfig) -> Self {
        Self {
            transport,
            driver,
            config,
        }
    }

    /// Returns the executor configuration.
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Interprets command text through the direct-call path.
    pub fn interpret_command<C>(
        &self,
        catalog: &C,
        cli_command: &str,
        credentials: &Credentials,
        default_region: &str,
    ) -> ProgramInterpretationResponse
    where
        C: SchemaCatalog + ?Sized,
    {
        self.interpret_command_with_limit(catalog, cli_command, credentials, default_region, None)
    }

    /// Interprets command text, forwarding a result limit to the transport.
    ///
    /// The limit is dropped for operations the catalog does not mark as
    /// paginated.
    pub fn interpret_command_with_limit<C>(
        &self,
        catalog: &C,
        cli_command: &str,
        credentials: &Credentials,
        default_region: &str,
        max_results: Option<u32>,
    ) -> ProgramInterpretationResponse
    where
        C: SchemaCatalog + ?Sized,
    {
        match translate_cli_to_ir(catalog, cli_command) {
            Ok(ir) => self.interpret_ir(&ir, credentials, default_region, max_results),
            Err(err) => ProgramInterpretationResponse::from_failures(
                vec![ValidationFailure::with_optional_context(err.to_string(), err.context())],
                Vec::new(),
            ),
        }
    }

    /// Validates and runs a translated API command.
    pub fn interpret_ir(
        &self,
        ir: &IRTranslation,
        credentials: &Credentials,
        default_region: &str,
        max_results: Option<u32>,
    ) -> ProgramInterpretationResponse {
        let region = resolve_region(ir, default_region);
        let mut outcome = validate_in_region(ir, &region);
        outcome.metadata = interpretation_metadata(ir, &region);
        if outcome.validation_failed() {
            return outcome;
        }
        let Some(metadata) = &ir.command_metadata else {
            outcome.validation_failures = Some(vec![ValidationFailure::without_context(
                ExecutorError::IncompleteTranslation.to_string(),
            )]);
            return outcome;
        };
        if ir.is_customization {
            outcome.validation_failures = Some(vec![ValidationFailure::new(
                format!(
                    "The command '{} {}' is a client-side customization and is not a single API \
                     call.",
                    ir.service_name, ir.operation_name
                ),
                ir.context_in(Some(region.as_str())),
            )]);
            return outcome;
        }
        outcome.response =
            Some(self.direct_call(ir, metadata, credentials, &region, max_results));
        outcome
    }

    /// Dispatches a translated command to the matching path.
    ///
    /// Customizations need no credentials; API commands acquire them from the
    /// provider only after validation passes.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError`] when the IR is incomplete or credentials are
    /// unavailable.
    pub fn dispatch<P>(
        &self,
        ir: &IRTranslation,
        cli_command: &str,
        credentials: &P,
        default_region: &str,
        max_results: Option<u32>,
    ) -> Result<DispatchOutcome, ExecutorError>
    where
        P: CredentialProvider + ?Sized,
    {
        let Some(metadata) = &ir.command_metadata else {
            return Err(ExecutorError::IncompleteTranslation);
        };
        if !metadata.is_complete() {
            return Err(ExecutorError::IncompleteTranslation);
        }
        if ir.is_customization {
            return Ok(DispatchOutcome::Customization(self.execute_customization(cli_command)));
        }
        let region = resolve_region(ir, default_region);
        let validation = validate_in_region(ir, &region);
        if validation.validation_failed() {
            return Ok(DispatchOutcome::DirectCall(ProgramInterpretationResponse {
                metadata: interpretation_metadata(ir, &region),
                ..validation
            }));
        }
        let credentials = credentials.get_local_credentials()?;
        Ok(DispatchOutcome::DirectCall(self.interpret_ir(
            ir,
            &credentials,
            default_region,
            max_results,
        )))
    }

    /// Runs a customization command through the driver.
    pub fn execute_customization(&self, cli_command: &str) -> CustomizationResponse {
        let command = match parse_command(cli_command) {
            Ok(command) => command,
            Err(err) => {
                return CustomizationResponse::Error(AwsApiErrorResponse::new(format!(
                    "Error while executing '{cli_command}': {err}"
                )));
            }
        };
        // `--profile x` and `--profile=x` both land in the parsed globals.
        let caller_profile = command.global.profile.is_some();
        let mut args = command.tokens.into_iter().skip(1).collect::<Vec<_>>();
        if let Some(profile) = &self.config.profile_name
            && !caller_profile
        {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        match self.driver.run(&args) {
            Ok(output) => CustomizationResponse::Output(AwsCliAliasResponse {
                response: output.stdout,
                error: output.stderr,
            }),
            Err(err) => CustomizationResponse::Error(AwsApiErrorResponse::new(format!(
                "Error while executing '{cli_command}': {err}"
            ))),
        }
    }

    /// Performs the direct API call and normalizes its outcome.
    fn direct_call(
        &self,
        ir: &IRTranslation,
        metadata: &CommandMetadata,
        credentials: &Credentials,
        region: &str,
        max_results: Option<u32>,
    ) -> InterpretationResponse {
        let global = ir.command.as_ref().map(|command| &command.global);
        let paginated = ir.operation.as_ref().is_some_and(|operation| operation.paginated);
        let request = ApiRequest {
            service: ir.service_name.clone(),
            operation: ir.operation_name.clone(),
            service_sdk_name: metadata.service_sdk_name.clone(),
            operation_sdk_name: metadata.operation_sdk_name.clone(),
            parameters: ir
                .parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<_, _>>(),
            region: region.to_string(),
            read_timeout: self.config.read_timeout,
            max_results: max_results.filter(|_| paginated),
            query: global.and_then(|global| global.query.clone()),
            endpoint_url: global.and_then(|global| global.endpoint_url.clone()),
        };
        match self.transport.invoke(&request, credentials) {
            Ok(response) => normalize_payload(&response.payload),
            Err(err) => InterpretationResponse {
                json: None,
                error: Some(err.to_string()),
                status_code: err.status_code(),
                error_code: err.error_code().map(str::to_string),
                pagination_token: None,
            },
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the metadata surfaced with every outcome.
#[must_use]
pub fn interpretation_metadata(ir: &IRTranslation, region: &str) -> Option<InterpretationMetadata> {
    ir.command_metadata.as_ref().map(|metadata| InterpretationMetadata {
        service: metadata.service_sdk_name.clone(),
        operation: metadata.operation_sdk_name.clone(),
        region_name: region.to_string(),
        service_full_name: metadata.service_full_sdk_name.clone(),
    })
}

/// Canonicalizes a successful payload.
fn normalize_payload(payload: &Value) -> InterpretationResponse {
    let pagination_token =
        payload.get(PAGINATION_TOKEN_KEY).and_then(Value::as_str).map(str::to_string);
    match serde_jcs::to_string(payload) {
        Ok(json) => InterpretationResponse {
            json: Some(json),
            error: None,
            status_code: 200,
            error_code: None,
            pagination_token,
        },
        Err(err) => InterpretationResponse {
            json: None,
            error: Some(format!("failed to canonicalize response: {err}")),
            status_code: 500,
            error_code: None,
            pagination_token: None,
        },
    }
}
