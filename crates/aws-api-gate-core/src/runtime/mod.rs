// crates/aws-api-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: AWS API Gate Runtime
// Description: Pipeline stages from translation to execution.
// Purpose: Implement resolution, validation, policy, and dispatch.
// Dependencies: crate::{core, interfaces, parser}
// ============================================================================

//! ## Overview
//! Runtime stages, leaves first: shorthand parsing, metadata resolution, IR
//! translation, validation, region resolution, the read-only policy, the
//! dual-dispatch executor, and the command gate that composes them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod executor;
pub mod gate;
pub mod policy;
pub mod region;
pub mod resolver;
pub mod shorthand;
pub mod translate;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::CommandAuditEvent;
pub use audit::CommandAuditEventParams;
pub use audit::CommandOutcome;
pub use audit::ExecutionStage;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use executor::DEFAULT_READ_TIMEOUT;
pub use executor::DispatchOutcome;
pub use executor::Executor;
pub use executor::ExecutorConfig;
pub use executor::ExecutorError;
pub use executor::interpretation_metadata;
pub use gate::CallOutcome;
pub use gate::CommandGate;
pub use gate::CommandGateConfig;
pub use gate::NO_CREDENTIALS_MESSAGE;
pub use gate::READ_ONLY_DENIED_MESSAGE;
pub use policy::PolicyError;
pub use policy::is_operation_read_only;
pub use region::FALLBACK_REGION;
pub use region::command_region;
pub use region::resolve_region;
pub use resolver::Resolution;
pub use resolver::ResolveError;
pub use resolver::resolve;
pub use shorthand::ShorthandError;
pub use shorthand::parse_shorthand;
pub use translate::translate_cli_to_ir;
pub use validator::validate;
pub use validator::validate_in_region;
