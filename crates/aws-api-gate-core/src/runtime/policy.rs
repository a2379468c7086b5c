// crates/aws-api-gate-core/src/runtime/policy.rs
// ============================================================================
// Module: Read-Only Policy
// Description: Classifies translated commands as read-only or mutating.
// Purpose: Back the read-only execution gate with a per-service allowlist.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! A command is read-only only when its service is in the allowlist and the
//! operation is listed for that service. Unknown services are mutating (fail
//! closed). An IR without complete metadata is a misuse of the pipeline and
//! is reported as [`PolicyError`] rather than as a policy decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ir::IRTranslation;
use crate::core::models::ReadOnlyOperations;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The IR lacks service or operation names.
    #[error(
        "failed to check if operation is allowed: translated command doesn't include service and operation name"
    )]
    IncompleteTranslation,
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns true when the command's operation is on the read-only allowlist.
///
/// # Errors
///
/// Returns [`PolicyError::IncompleteTranslation`] when the IR has no metadata
/// or an empty service or operation name.
pub fn is_operation_read_only(
    ir: &IRTranslation,
    read_only_operations: &ReadOnlyOperations,
) -> Result<bool, PolicyError> {
    let metadata = ir.command_metadata.as_ref().ok_or(PolicyError::IncompleteTranslation)?;
    if !metadata.is_complete() {
        return Err(PolicyError::IncompleteTranslation);
    }
    Ok(read_only_operations.has(&metadata.service_sdk_name, &metadata.operation_sdk_name))
}
