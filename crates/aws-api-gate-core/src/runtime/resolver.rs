// crates/aws-api-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Command Metadata Resolver
// Description: Maps service and operation tokens to canonical SDK names.
// Purpose: Identify the remote capability a command invokes.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Resolution consults the schema catalog with normalized tokens. A command
//! is either a client-side customization (checked first, so `aws s3 ls` never
//! falls through to an API lookup) or an API operation. An unknown operation
//! of a known service is a reportable [`ValidationFailure`]; an unknown
//! service is a parse-level error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::catalog::OperationSchema;
use crate::core::models::CommandMetadata;
use crate::core::models::Context;
use crate::core::models::ValidationFailure;
use crate::core::names::normalize_token;
use crate::interfaces::SchemaCatalog;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Successful resolution of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An API operation with its schema.
    Operation {
        /// Canonical names.
        metadata: CommandMetadata,
        /// Operation schema.
        schema: Arc<OperationSchema>,
    },
    /// A client-side customization command.
    Customization {
        /// Canonical names.
        metadata: CommandMetadata,
    },
}

impl Resolution {
    /// Returns the canonical names.
    #[must_use]
    pub const fn metadata(&self) -> &CommandMetadata {
        match self {
            Self::Operation {
                metadata,
                ..
            }
            | Self::Customization {
                metadata,
            } => metadata,
        }
    }
}

/// Resolution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No service or customization namespace matches the token.
    UnknownService {
        /// Normalized service token.
        service: String,
    },
    /// The service is known but the operation is not.
    UnknownOperation {
        /// Best-effort metadata carrying the literal tokens.
        metadata: CommandMetadata,
        /// Reportable failure.
        failure: ValidationFailure,
    },
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Resolves service and operation tokens against the catalog.
///
/// # Errors
///
/// Returns [`ResolveError`] when the service or operation is unknown.
pub fn resolve<C>(catalog: &C, service: &str, operation: &str) -> Result<Resolution, ResolveError>
where
    C: SchemaCatalog + ?Sized,
{
    let service_token = normalize_token(service);
    let operation_token = normalize_token(operation);

    if let Some(customization) = catalog.customization(&service_token)
        && customization.has_command(&operation_token)
    {
        return Ok(Resolution::Customization {
            metadata: CommandMetadata {
                service_sdk_name: customization.sdk_name.clone(),
                service_full_sdk_name: customization.full_name.clone(),
                operation_sdk_name: operation_token,
            },
        });
    }

    if let Some(service_schema) = catalog.service(&service_token) {
        if let Some(schema) = catalog.operation(&service_token, &operation_token) {
            return Ok(Resolution::Operation {
                metadata: CommandMetadata {
                    service_sdk_name: service_schema.sdk_name.clone(),
                    service_full_sdk_name: service_schema.full_name.clone(),
                    operation_sdk_name: schema.sdk_name.clone(),
                },
                schema,
            });
        }
        return Err(unknown_operation(
            &service_token,
            &operation_token,
            &service_schema.sdk_name,
            &service_schema.full_name,
        ));
    }

    if let Some(customization) = catalog.customization(&service_token) {
        return Err(unknown_operation(
            &service_token,
            &operation_token,
            &customization.sdk_name,
            &customization.full_name,
        ));
    }

    Err(ResolveError::UnknownService {
        service: service_token,
    })
}

/// Builds the unknown-operation failure with literal tokens.
fn unknown_operation(
    service: &str,
    operation: &str,
    sdk_name: &str,
    full_name: &str,
) -> ResolveError {
    ResolveError::UnknownOperation {
        metadata: CommandMetadata {
            service_sdk_name: sdk_name.to_string(),
            service_full_sdk_name: full_name.to_string(),
            operation_sdk_name: operation.to_string(),
        },
        failure: ValidationFailure::new(
            format!("The operation '{operation}' for service '{service}' does not exist."),
            Context::for_command(service, operation),
        ),
    }
}
