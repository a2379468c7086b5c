// crates/aws-api-gate-core/src/lib.rs
// ============================================================================
// Module: AWS API Gate Core Library
// Description: Public API surface for the AWS command interpretation pipeline.
// Purpose: Expose core types, interfaces, the parser, and runtime stages.
// Dependencies: crate::{core, interfaces, parser, runtime}
// ============================================================================

//! ## Overview
//! AWS API Gate core turns `aws <service> <operation> [args...]` text into a
//! validated intermediate representation, resolves its region, gates it by a
//! read-only policy and dispatches it either as a direct API call or as a
//! client-side customization. It is backend-agnostic and reaches AWS only
//! through the traits in [`interfaces`].
//!
//! Security posture: command text is untrusted; inputs are size-limited and
//! every stage fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod parser;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ApiRequest;
pub use interfaces::ApiResponse;
pub use interfaces::ApiTransport;
pub use interfaces::CredentialError;
pub use interfaces::CredentialProvider;
pub use interfaces::CustomizationDriver;
pub use interfaces::DriverError;
pub use interfaces::DriverOutput;
pub use interfaces::SchemaCatalog;
pub use interfaces::TransportError;
pub use parser::ParseError;
pub use parser::ParsedCommand;
pub use parser::parse_command;
pub use runtime::CallOutcome;
pub use runtime::CommandGate;
pub use runtime::CommandGateConfig;
pub use runtime::DEFAULT_READ_TIMEOUT;
pub use runtime::DispatchOutcome;
pub use runtime::Executor;
pub use runtime::ExecutorConfig;
pub use runtime::ExecutorError;
pub use runtime::PolicyError;
pub use runtime::is_operation_read_only;
pub use runtime::resolve_region;
pub use runtime::translate_cli_to_ir;
pub use runtime::validate;
pub use runtime::validate_in_region;
