// crates/aws-api-gate-cli/src/wiring.rs
// ============================================================================
// Module: Component Wiring
// Description: Builds catalog, audit sink, providers, and gate from config.
// Purpose: Keep the binary thin and the assembly rules testable.
// Dependencies: aws-api-gate-config, aws-api-gate-core, aws-api-gate-providers
// ============================================================================

//! ## Overview
//! Every component is derived from one validated [`AwsApiGateConfig`]. The
//! offline subcommands (`translate`, `validate`, `read-only`, `catalog`) only
//! need the catalog; `call` additionally requires a default region and builds
//! the AWS CLI backed providers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use aws_api_gate_config::AuditSinkKind;
use aws_api_gate_config::AwsApiGateConfig;
use aws_api_gate_config::ConfigError;
use aws_api_gate_core::CatalogError;
use aws_api_gate_core::SchemaCatalog;
use aws_api_gate_core::ServiceSchema;
use aws_api_gate_core::StaticCatalog;
use aws_api_gate_core::is_operation_read_only;
use aws_api_gate_core::runtime::AuditSink;
use aws_api_gate_core::runtime::CommandGate;
use aws_api_gate_core::runtime::Executor;
use aws_api_gate_core::runtime::FileAuditSink;
use aws_api_gate_core::runtime::NoopAuditSink;
use aws_api_gate_core::runtime::StderrAuditSink;
use aws_api_gate_core::translate_cli_to_ir;
use aws_api_gate_providers::AwsCliDriver;
use aws_api_gate_providers::AwsCliTransport;
use aws_api_gate_providers::AwsConfigCredentialProvider;
use aws_api_gate_providers::CliProcessConfig;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate assembled from the production providers.
pub type ProductionGate =
    CommandGate<StaticCatalog, AwsCliTransport, AwsCliDriver, AwsConfigCredentialProvider>;

/// Read-only classification of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOnlyReport {
    /// SDK service name.
    pub service: String,
    /// SDK operation name.
    pub operation: String,
    /// True for client-side customizations.
    pub customization: bool,
    /// Whether the operation may run in read-only mode.
    pub read_only: bool,
}

/// Wiring failures.
#[derive(Debug, Error)]
pub enum WiringError {
    /// Configuration is unusable for the requested command.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Audit sink could not be opened.
    #[error("audit sink unavailable: {0}")]
    Audit(String),
    /// A provider could not be initialized.
    #[error("provider unavailable: {0}")]
    Provider(String),
    /// Command could not be classified.
    #[error("{0}")]
    Command(String),
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Loads the configured catalog, or the built-in one.
///
/// # Errors
///
/// Returns [`WiringError::Catalog`] when the catalog fails to load.
pub fn load_catalog(config: &AwsApiGateConfig) -> Result<StaticCatalog, WiringError> {
    let catalog = match &config.catalog.path {
        Some(path) => StaticCatalog::load(path)?,
        None => StaticCatalog::builtin()?,
    };
    Ok(catalog)
}

/// Opens the configured audit sink.
///
/// # Errors
///
/// Returns [`WiringError::Audit`] when the audit file cannot be opened.
pub fn build_audit_sink(config: &AwsApiGateConfig) -> Result<Arc<dyn AuditSink>, WiringError> {
    match config.audit.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkKind::File => {
            let path = config.audit.path.as_deref().ok_or_else(|| {
                WiringError::Audit("audit.path is required when audit.sink is file".to_string())
            })?;
            let sink = FileAuditSink::new(path)
                .map_err(|err| WiringError::Audit(format!("{}: {err}", path.display())))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Derives the AWS CLI process settings.
#[must_use]
pub fn cli_process_config(config: &AwsApiGateConfig) -> CliProcessConfig {
    CliProcessConfig {
        cli_path: config.execution.cli_path.clone(),
        working_dir: config.execution.working_dir.clone(),
        max_output_bytes: config.execution.max_output_bytes,
    }
}

/// Builds the command gate with the AWS CLI backed providers.
///
/// # Errors
///
/// Returns [`WiringError`] when the region is missing, the working
/// directory cannot be created, or a component fails to initialize.
pub fn build_gate(config: &AwsApiGateConfig) -> Result<ProductionGate, WiringError> {
    let gate_config = config.gate_config()?;
    config.ensure_working_dir()?;
    let catalog = load_catalog(config)?;
    let audit = build_audit_sink(config)?;
    let process = cli_process_config(config);
    let transport = AwsCliTransport::new(process.clone())
        .map_err(|err| WiringError::Provider(err.to_string()))?;
    let driver = AwsCliDriver::new(process).map_err(|err| WiringError::Provider(err.to_string()))?;
    let credentials = AwsConfigCredentialProvider::new(
        config.aws.profile.clone(),
        Some(gate_config.default_region.clone()),
    )
    .map_err(|err| WiringError::Provider(err.to_string()))?;
    let executor = Executor::new(transport, driver, config.executor_config());
    Ok(CommandGate::new(catalog, executor, credentials, gate_config, audit))
}

// ============================================================================
// SECTION: Offline Queries
// ============================================================================

/// Classifies a command against the catalog's read-only allowlist.
///
/// # Errors
///
/// Returns [`WiringError::Command`] when the command does not translate to
/// a known service and operation.
pub fn read_only_report<C: SchemaCatalog>(
    catalog: &C,
    cli_command: &str,
) -> Result<ReadOnlyReport, WiringError> {
    let ir = translate_cli_to_ir(catalog, cli_command)
        .map_err(|err| WiringError::Command(err.to_string()))?;
    let resolved = ir.is_customization || ir.operation.is_some();
    let Some(metadata) = ir.command_metadata.clone().filter(|_| resolved) else {
        let reason = ir
            .translation_failures
            .first()
            .map_or_else(|| "command could not be translated".to_string(), |failure| {
                failure.reason.clone()
            });
        return Err(WiringError::Command(reason));
    };
    let read_only = is_operation_read_only(&ir, &catalog.read_only_operations())
        .map_err(|err| WiringError::Command(err.to_string()))?;
    Ok(ReadOnlyReport {
        service: metadata.service_sdk_name,
        operation: metadata.operation_sdk_name,
        customization: ir.is_customization,
        read_only,
    })
}

/// Summarizes the catalog, or one service in detail.
///
/// # Errors
///
/// Returns [`WiringError::Command`] when the requested service is unknown.
pub fn catalog_summary(
    catalog: &StaticCatalog,
    service: Option<&str>,
) -> Result<Value, WiringError> {
    if let Some(token) = service {
        let schema = catalog
            .service(token)
            .ok_or_else(|| WiringError::Command(format!("The service '{token}' is not known")))?;
        let operations = schema
            .operations
            .values()
            .map(|operation| serde_json::to_value(operation.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| WiringError::Command(err.to_string()))?;
        return Ok(json!({
            "cli_name": schema.cli_name,
            "sdk_name": schema.sdk_name,
            "full_name": schema.full_name,
            "operations": operations,
        }));
    }
    let services: Vec<Value> = catalog.services().map(service_entry).collect();
    let customizations: Vec<Value> = catalog
        .customizations()
        .map(|custom| {
            json!({
                "cli_name": custom.cli_name,
                "commands": custom.commands,
                "read_only": custom.read_only,
            })
        })
        .collect();
    Ok(json!({
        "version": catalog.version(),
        "services": services,
        "customizations": customizations,
    }))
}

/// Renders one service with operation names only.
fn service_entry(schema: &ServiceSchema) -> Value {
    let operations: Vec<Value> = schema
        .operations
        .values()
        .map(|operation| {
            json!({
                "cli_name": operation.cli_name,
                "sdk_name": operation.sdk_name,
                "read_only": operation.read_only,
                "paginated": operation.paginated,
            })
        })
        .collect();
    json!({
        "cli_name": schema.cli_name,
        "sdk_name": schema.sdk_name,
        "full_name": schema.full_name,
        "operations": operations,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
