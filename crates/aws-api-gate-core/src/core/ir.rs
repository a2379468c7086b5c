// crates/aws-api-gate-core/src/core/ir.rs
// ============================================================================
// Module: Intermediate Representation
// Description: The translated, typed form of a single command.
// Purpose: Carry resolved metadata and typed parameters between pipeline stages.
// Dependencies: crate::core, crate::parser, serde, serde_json
// ============================================================================

//! ## Overview
//! An [`IRTranslation`] is produced by translation and consumed by validation,
//! region resolution, the read-only policy, and the executor. It is owned by
//! the invocation that created it and never shared across commands.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::catalog::OperationSchema;
use crate::core::models::CommandMetadata;
use crate::core::models::Context;
use crate::core::models::ValidationFailure;
use crate::parser::ParsedCommand;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Translated command.
///
/// # Invariants
/// - `command_metadata == None` never reaches the executor.
/// - `operation` is set only when the command resolved to an API operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IRTranslation {
    /// Resolved SDK names; `None` when translation failed.
    pub command_metadata: Option<CommandMetadata>,
    /// Typed parameters keyed by canonical name.
    pub parameters: BTreeMap<String, Value>,
    /// Normalized CLI service name.
    pub service_name: String,
    /// Normalized CLI operation name.
    pub operation_name: String,
    /// Parsed command the translation came from.
    pub command: Option<ParsedCommand>,
    /// Operation schema for API commands.
    #[serde(skip)]
    pub operation: Option<Arc<OperationSchema>>,
    /// True for client-side customization commands.
    pub is_customization: bool,
    /// Failures recorded while translating.
    pub translation_failures: Vec<ValidationFailure>,
}

impl IRTranslation {
    /// Returns a context naming this command's service and operation and its
    /// `--query` operators.
    #[must_use]
    pub fn context(&self) -> Context {
        self.context_in(None)
    }

    /// Returns [`Self::context`] with the region the command runs in.
    #[must_use]
    pub fn context_in(&self, region: Option<&str>) -> Context {
        let mut context = Context::for_command(&self.service_name, &self.operation_name);
        context.region = region.map(str::to_string);
        context.operators = self.command.as_ref().and_then(ParsedCommand::operators);
        context
    }

    /// Returns true when the flag was supplied on the command line.
    #[must_use]
    pub fn flag_supplied(&self, flag: &str) -> bool {
        let Some(command) = &self.command else {
            return false;
        };
        let negated = flag.strip_prefix("--").map(|rest| format!("--no-{rest}"));
        command.arguments.iter().any(|argument| {
            argument.flag == flag || negated.as_deref() == Some(argument.flag.as_str())
        })
    }
}
