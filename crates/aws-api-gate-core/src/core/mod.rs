// crates/aws-api-gate-core/src/core/mod.rs
// ============================================================================
// Module: AWS API Gate Core Types
// Description: Canonical models, schemas, and the intermediate representation.
// Purpose: Provide stable, serializable types shared by every pipeline stage.
// Dependencies: serde, serde_json, jsonschema
// ============================================================================

//! ## Overview
//! Core types cover command metadata, validation failures, interpretation
//! responses, the schema catalog, and the translated command IR. These types
//! are the source of truth for anything the CLI or a host serializes.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod ir;
pub mod models;
pub mod names;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogError;
pub use catalog::CustomizationSchema;
pub use catalog::MAX_CATALOG_BYTES;
pub use catalog::OperationSchema;
pub use catalog::ParameterSchema;
pub use catalog::ParameterType;
pub use catalog::ServiceSchema;
pub use catalog::StaticCatalog;
pub use ir::IRTranslation;
pub use models::AwsApiErrorResponse;
pub use models::AwsCliAliasResponse;
pub use models::CommandMetadata;
pub use models::Context;
pub use models::Credentials;
pub use models::CustomizationResponse;
pub use models::InterpretationMetadata;
pub use models::InterpretationResponse;
pub use models::ProgramInterpretationResponse;
pub use models::ReadOnlyOperations;
pub use models::ValidationFailure;
