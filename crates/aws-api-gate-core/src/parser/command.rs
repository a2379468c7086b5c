// crates/aws-api-gate-core/src/parser/command.rs
// ============================================================================
// Module: Command Structure Parser
// Description: Groups classified tokens into service, operation, and arguments.
// Purpose: Build a `ParsedCommand` from `aws <service> <operation> [args...]`.
// Dependencies: crate::parser::lexer, serde
// ============================================================================

//! ## Overview
//! Grammar (informal):
//! - `aws [global-option...] <service> [global-option...] <operation> [item...]`
//! - `item` is `--flag [value...]`, `--flag=value`, a global option, or a
//!   positional word.
//!
//! A multi-value flag collects every following word up to the next flag or
//! the end of input. `--flag=value` binds exactly one value. Global options
//! such as `--region` and `--query` are recognized anywhere after the program
//! name and are kept out of the operation's arguments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::parser::ParseError;
use crate::parser::lexer::SpannedToken;
use crate::parser::lexer::Token;
use crate::parser::lexer::classify;
use crate::parser::lexer::split_command;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Program name every command must start with.
pub const PROGRAM_NAME: &str = "aws";

/// Global options and whether each takes a value.
const GLOBAL_OPTIONS: &[(&str, bool)] = &[
    ("--region", true),
    ("--profile", true),
    ("--output", true),
    ("--query", true),
    ("--endpoint-url", true),
    ("--max-items", true),
    ("--page-size", true),
    ("--starting-token", true),
    ("--cli-read-timeout", true),
    ("--cli-connect-timeout", true),
    ("--color", true),
    ("--ca-bundle", true),
    ("--debug", false),
    ("--no-paginate", false),
    ("--no-verify-ssl", false),
    ("--no-sign-request", false),
    ("--no-cli-pager", false),
];

// ============================================================================
// SECTION: Types
// ============================================================================

/// One operation flag and the raw values that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArgument {
    /// Flag as written, including dashes.
    pub flag: String,
    /// Raw values in order; empty for presence flags.
    pub values: Vec<String>,
    /// Word index of the flag.
    pub position: usize,
}

/// Global options recognized anywhere in the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalArgs {
    /// `--region`.
    pub region: Option<String>,
    /// `--profile`.
    pub profile: Option<String>,
    /// `--query` (client-side filter expression).
    pub query: Option<String>,
    /// `--output`.
    pub output: Option<String>,
    /// `--endpoint-url`.
    pub endpoint_url: Option<String>,
    /// Remaining global options; switches map to `None`.
    pub other: BTreeMap<String, Option<String>>,
}

/// Structured form of a command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// Program word (always `aws`).
    pub program: String,
    /// Service token as written.
    pub service: String,
    /// Operation token as written.
    pub operation: String,
    /// Operation flags in command order.
    pub arguments: Vec<ParsedArgument>,
    /// Words not attached to any flag.
    pub positional: Vec<String>,
    /// Global options.
    pub global: GlobalArgs,
    /// All shell words of the command.
    pub tokens: Vec<String>,
}

impl ParsedCommand {
    /// Returns the first argument with the given flag.
    #[must_use]
    pub fn argument(&self, flag: &str) -> Option<&ParsedArgument> {
        self.arguments.iter().find(|argument| argument.flag == flag)
    }

    /// Returns the client-side filter operators of the command.
    #[must_use]
    pub fn operators(&self) -> Option<Vec<String>> {
        self.global.query.as_ref().map(|query| vec![query.clone()])
    }

    /// Returns every raw value supplied to operation flags or positionally.
    pub fn argument_values(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .flat_map(|argument| argument.values.iter())
            .chain(self.positional.iter())
            .map(String::as_str)
    }
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses command text into a [`ParsedCommand`].
///
/// # Errors
///
/// Returns [`ParseError`] when the text cannot be tokenized or does not have
/// the `aws <service> <operation>` shape.
pub fn parse_command(input: &str) -> Result<ParsedCommand, ParseError> {
    let words = split_command(input)?;
    let tokens = classify(&words);
    let mut parser = CommandParser::new(tokens);
    let mut command = parser.parse()?;
    command.tokens = words;
    Ok(command)
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Single-pass parser over classified tokens.
struct CommandParser {
    /// Token stream.
    tokens: Vec<SpannedToken>,
    /// Current token index.
    index: usize,
    /// Global options collected so far.
    global: GlobalArgs,
}

impl CommandParser {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            index: 0,
            global: GlobalArgs {
                region: None,
                profile: None,
                query: None,
                output: None,
                endpoint_url: None,
                other: BTreeMap::new(),
            },
        }
    }

    /// Parses the whole command.
    fn parse(&mut self) -> Result<ParsedCommand, ParseError> {
        let program = match self.advance() {
            Some(Token::Word(word)) if word == PROGRAM_NAME => word,
            Some(Token::Word(word)) => {
                return Err(ParseError::InvalidProgram {
                    found: word,
                });
            }
            Some(Token::Flag {
                name,
                ..
            }) => {
                return Err(ParseError::InvalidProgram {
                    found: name,
                });
            }
            None => return Err(ParseError::EmptyInput),
        };

        self.leading_globals()?;
        let Some(service) = self.next_word() else {
            return Err(ParseError::MissingService);
        };
        self.leading_globals()?;
        let Some(operation) = self.next_word() else {
            return Err(ParseError::MissingOperation {
                service,
            });
        };

        let (arguments, positional) = self.parse_items()?;
        Ok(ParsedCommand {
            program,
            service,
            operation,
            arguments,
            positional,
            global: std::mem::take(&mut self.global),
            tokens: Vec::new(),
        })
    }

    /// Consumes global options that precede the service or operation.
    fn leading_globals(&mut self) -> Result<(), ParseError> {
        while let Some(Token::Flag {
            name,
            inline_value,
        }) = self.current().cloned()
        {
            if global_option(&name).is_none() {
                return Err(ParseError::UnknownGlobalOption {
                    flag: name,
                });
            }
            self.index += 1;
            self.take_global(&name, inline_value)?;
        }
        Ok(())
    }

    /// Parses operation arguments, globals, and positional words.
    fn parse_items(&mut self) -> Result<(Vec<ParsedArgument>, Vec<String>), ParseError> {
        let mut arguments = Vec::new();
        let mut positional = Vec::new();
        while let Some(spanned) = self.tokens.get(self.index).cloned() {
            self.index += 1;
            match spanned.token {
                Token::Word(word) => positional.push(word),
                Token::Flag {
                    name,
                    inline_value,
                } => {
                    if global_option(&name).is_some() {
                        self.take_global(&name, inline_value)?;
                        continue;
                    }
                    let values = match inline_value {
                        Some(value) => vec![value],
                        None => self.collect_words(),
                    };
                    arguments.push(ParsedArgument {
                        flag: name,
                        values,
                        position: spanned.position,
                    });
                }
            }
        }
        Ok((arguments, positional))
    }

    /// Records a global option, consuming its value when it takes one.
    fn take_global(&mut self, name: &str, inline_value: Option<String>) -> Result<(), ParseError> {
        let takes_value = global_option(name).unwrap_or(false);
        let value = if takes_value {
            match inline_value {
                Some(value) => Some(value),
                None => Some(self.next_word().ok_or_else(|| ParseError::MissingOptionValue {
                    flag: name.to_string(),
                })?),
            }
        } else {
            None
        };
        match name {
            "--region" => self.global.region = value,
            "--profile" => self.global.profile = value,
            "--query" => self.global.query = value,
            "--output" => self.global.output = value,
            "--endpoint-url" => self.global.endpoint_url = value,
            _ => {
                self.global.other.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Collects consecutive plain words.
    fn collect_words(&mut self) -> Vec<String> {
        let mut values = Vec::new();
        while let Some(Token::Word(word)) = self.current() {
            values.push(word.clone());
            self.index += 1;
        }
        values
    }

    /// Consumes the current token when it is a plain word.
    fn next_word(&mut self) -> Option<String> {
        match self.current() {
            Some(Token::Word(word)) => {
                let word = word.clone();
                self.index += 1;
                Some(word)
            }
            _ => None,
        }
    }

    /// Returns the current token.
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|spanned| &spanned.token)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|spanned| spanned.token.clone());
        if token.is_some() {
            self.index += 1;
        }
        token
    }
}

/// Returns whether the flag is a global option and whether it takes a value.
fn global_option(flag: &str) -> Option<bool> {
    GLOBAL_OPTIONS.iter().find(|(name, _)| *name == flag).map(|(_, takes_value)| *takes_value)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn multi_value_flags_collect_until_next_flag() {
        let command =
            parse_command("aws cloud9 describe-environments --environment-ids a b --foo c")
                .unwrap();
        assert_eq!(command.service, "cloud9");
        assert_eq!(command.operation, "describe-environments");
        assert_eq!(command.arguments[0].values, vec!["a", "b"]);
        assert_eq!(command.arguments[1].flag, "--foo");
        assert_eq!(command.arguments[1].position, 6);
    }

    #[test]
    fn globals_are_kept_out_of_arguments() {
        let command = parse_command(
            "aws --region eu-west-1 ec2 describe-instances --query Reservations --debug",
        )
        .unwrap();
        assert_eq!(command.global.region.as_deref(), Some("eu-west-1"));
        assert_eq!(command.operators(), Some(vec!["Reservations".to_string()]));
        assert!(command.global.other.contains_key("--debug"));
        assert!(command.arguments.is_empty());
    }

    #[test]
    fn positional_words_are_preserved() {
        let command = parse_command("aws s3 cp ./a s3://bucket/a --recursive").unwrap();
        assert_eq!(command.positional, vec!["./a", "s3://bucket/a"]);
        assert_eq!(command.arguments[0].flag, "--recursive");
        assert!(command.arguments[0].values.is_empty());
    }

    #[test]
    fn inline_values_bind_one_value() {
        let command = parse_command("aws ec2 describe-instances --max-results=5 extra").unwrap();
        assert_eq!(command.arguments[0].values, vec!["5"]);
        assert_eq!(command.positional, vec!["extra"]);
    }

    #[test]
    fn structural_errors_are_tagged() {
        assert_eq!(
            parse_command("s3api list-buckets"),
            Err(ParseError::InvalidProgram {
                found: "s3api".to_string(),
            })
        );
        assert_eq!(parse_command("aws"), Err(ParseError::MissingService));
        assert_eq!(
            parse_command("aws sts"),
            Err(ParseError::MissingOperation {
                service: "sts".to_string(),
            })
        );
        assert_eq!(
            parse_command("aws --bogus sts get-caller-identity"),
            Err(ParseError::UnknownGlobalOption {
                flag: "--bogus".to_string(),
            })
        );
        assert_eq!(
            parse_command("aws sts get-caller-identity --region"),
            Err(ParseError::MissingOptionValue {
                flag: "--region".to_string(),
            })
        );
    }
}
