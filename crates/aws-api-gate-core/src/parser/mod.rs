// crates/aws-api-gate-core/src/parser/mod.rs
// ============================================================================
// Module: Command Parser
// Description: Syntactic parsing of `aws <service> <operation> [args...]` text.
// Purpose: Produce a structured command without consulting any schema.
// Dependencies: shlex, serde, thiserror
// ============================================================================

//! ## Overview
//! Parsing is purely syntactic. The lexer splits shell words and classifies
//! flags; the command parser separates global options from operation
//! arguments, groups multi-value flags, and keeps positional words for
//! customization commands. Failures are tagged [`ParseError`] values.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod command;
pub mod lexer;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::models::Context;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::GlobalArgs;
pub use command::ParsedArgument;
pub use command::ParsedCommand;
pub use command::parse_command;
pub use lexer::MAX_COMMAND_BYTES;
pub use lexer::MAX_COMMAND_TOKENS;
pub use lexer::split_command;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing command text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace.
    #[error("command is empty")]
    EmptyInput,
    /// Input exceeded the size limit.
    #[error("command exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input produced too many tokens.
    #[error("command has too many tokens: {actual_tokens} (max {max_tokens})")]
    TooManyTokens {
        /// Maximum allowed tokens.
        max_tokens: usize,
        /// Actual token count.
        actual_tokens: usize,
    },
    /// A quote was opened and never closed.
    #[error("command has unbalanced quotes")]
    UnbalancedQuotes,
    /// The first word is not the `aws` program.
    #[error("Command must start with 'aws', found '{found}'")]
    InvalidProgram {
        /// The word that was found instead.
        found: String,
    },
    /// No service token follows the program.
    #[error("command is missing a service name")]
    MissingService,
    /// No operation token follows the service.
    #[error("command is missing an operation for service '{service}'")]
    MissingOperation {
        /// Service token.
        service: String,
    },
    /// The service token names no known service.
    #[error("The service '{service}' does not exist.")]
    UnknownService {
        /// Normalized service token.
        service: String,
        /// Normalized operation token.
        operation: String,
    },
    /// An unrecognized option appeared before the service token.
    #[error("unknown option '{flag}' before the service name")]
    UnknownGlobalOption {
        /// The option as written.
        flag: String,
    },
    /// A global option that takes a value had none.
    #[error("option '{flag}' requires a value")]
    MissingOptionValue {
        /// The option as written.
        flag: String,
    },
}

impl ParseError {
    /// Returns the command location the error refers to, when the tokens were
    /// read before parsing stopped.
    #[must_use]
    pub fn context(&self) -> Option<Context> {
        match self {
            Self::UnknownService {
                service,
                operation,
            } => Some(Context::for_command(service, operation)),
            Self::MissingOperation {
                service,
            } => Some(Context {
                service: Some(service.clone()),
                ..Context::default()
            }),
            _ => None,
        }
    }
}
