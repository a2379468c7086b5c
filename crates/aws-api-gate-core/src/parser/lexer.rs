// crates/aws-api-gate-core/src/parser/lexer.rs
// ============================================================================
// Module: Command Lexer
// Description: Shell-style tokenization of raw command text.
// Purpose: Split command text into classified tokens under hard input limits.
// Dependencies: shlex
// ============================================================================

//! ## Overview
//! Command text follows POSIX shell quoting: quoted segments form a single
//! token and unbalanced quotes are rejected. Words are then classified into
//! flags (`--name`, `--name=value`) and plain words, each tagged with its
//! index in the word stream for diagnostics.
//!
//! Security posture: command text is untrusted; input size and token counts
//! are bounded before any further processing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::names::is_flag;
use crate::parser::ParseError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed command size in bytes.
pub const MAX_COMMAND_BYTES: usize = 64 * 1024;
/// Maximum number of tokens in a command.
pub const MAX_COMMAND_TOKENS: usize = 4096;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// A classified command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `--name` or `--name=value`.
    Flag {
        /// Flag including its leading dashes.
        name: String,
        /// Value attached with `=`.
        inline_value: Option<String>,
    },
    /// Any other word.
    Word(String),
}

/// Token paired with its index in the word stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// Token value.
    pub token: Token,
    /// Word index in the command.
    pub position: usize,
}

// ============================================================================
// SECTION: Lexing
// ============================================================================

/// Splits command text into shell words.
///
/// # Errors
///
/// Returns [`ParseError`] for empty or oversized input, unbalanced quotes, or
/// too many tokens.
pub fn split_command(input: &str) -> Result<Vec<String>, ParseError> {
    if input.len() > MAX_COMMAND_BYTES {
        return Err(ParseError::InputTooLarge {
            max_bytes: MAX_COMMAND_BYTES,
            actual_bytes: input.len(),
        });
    }
    if input.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let words = shlex::split(input).ok_or(ParseError::UnbalancedQuotes)?;
    if words.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    if words.len() > MAX_COMMAND_TOKENS {
        return Err(ParseError::TooManyTokens {
            max_tokens: MAX_COMMAND_TOKENS,
            actual_tokens: words.len(),
        });
    }
    Ok(words)
}

/// Classifies shell words into flags and plain words.
#[must_use]
pub fn classify(words: &[String]) -> Vec<SpannedToken> {
    words
        .iter()
        .enumerate()
        .map(|(position, word)| SpannedToken {
            token: classify_word(word),
            position,
        })
        .collect()
}

/// Classifies a single word.
fn classify_word(word: &str) -> Token {
    if !is_flag(word) {
        return Token::Word(word.to_string());
    }
    match word.split_once('=') {
        Some((name, value)) if is_flag(name) => Token::Flag {
            name: name.to_string(),
            inline_value: Some(value.to_string()),
        },
        _ => Token::Flag {
            name: word.to_string(),
            inline_value: None,
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
