// crates/aws-api-gate-core/src/runtime/shorthand.rs
// ============================================================================
// Module: Shorthand Syntax Parser
// Description: Parser for `Key=value,Other=a,b` structure shorthand.
// Purpose: Turn CLI shorthand into JSON objects for structure parameters.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Shorthand is a flat `key=value` list separated by commas. A comma followed
//! by a segment without `=` continues the previous key as a list, so
//! `Values=a,b` yields `["a", "b"]`. Values may be quoted, and `[a,b]` is an
//! explicit list. Nested structures must be written as JSON instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Shorthand syntax errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShorthandError {
    /// The input had no content.
    #[error("shorthand value is empty")]
    Empty,
    /// A segment had no `=`.
    #[error("expected 'key=value' at offset {position}")]
    MissingEquals {
        /// Byte offset of the segment.
        position: usize,
    },
    /// A key was empty.
    #[error("empty key at offset {position}")]
    EmptyKey {
        /// Byte offset of the key.
        position: usize,
    },
    /// A key appeared twice.
    #[error("duplicate key '{key}'")]
    DuplicateKey {
        /// Repeated key.
        key: String,
    },
    /// A quote or bracket was never closed.
    #[error("unterminated '{delimiter}' starting at offset {position}")]
    Unterminated {
        /// Opening delimiter.
        delimiter: char,
        /// Byte offset of the delimiter.
        position: usize,
    },
    /// A nested `{...}` structure was used.
    #[error("nested structures are not supported in shorthand at offset {position}; use JSON")]
    NestedStructure {
        /// Byte offset of the brace.
        position: usize,
    },
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses shorthand syntax into a JSON object.
///
/// # Errors
///
/// Returns [`ShorthandError`] when the input is not valid shorthand.
pub fn parse_shorthand(input: &str) -> Result<Map<String, Value>, ShorthandError> {
    if input.trim().is_empty() {
        return Err(ShorthandError::Empty);
    }
    ShorthandParser::new(input).parse()
}

/// Returns true when the text looks like shorthand rather than a bare value.
#[must_use]
pub fn looks_like_shorthand(input: &str) -> bool {
    let trimmed = input.trim_start();
    match (trimmed.find('='), trimmed.find(',')) {
        (Some(equals), Some(comma)) => equals < comma,
        (Some(_), None) => true,
        _ => false,
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Byte-offset parser over shorthand input.
struct ShorthandParser<'a> {
    /// Source input.
    input: &'a str,
    /// Current byte offset.
    offset: usize,
}

impl<'a> ShorthandParser<'a> {
    /// Creates a parser for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Parses the full input.
    fn parse(&mut self) -> Result<Map<String, Value>, ShorthandError> {
        let mut map = Map::new();
        loop {
            let key = self.parse_key()?;
            let mut value = self.parse_value()?;
            while self.peek() == Some(b',') && !self.next_segment_is_key() {
                self.offset += 1;
                let extra = self.parse_scalar()?;
                value = append(value, extra);
            }
            if map.contains_key(&key) {
                return Err(ShorthandError::DuplicateKey {
                    key,
                });
            }
            map.insert(key, value);
            match self.peek() {
                None => break,
                Some(b',') => self.offset += 1,
                Some(_) => {
                    return Err(ShorthandError::MissingEquals {
                        position: self.offset,
                    });
                }
            }
        }
        Ok(map)
    }

    /// Parses a key up to `=`.
    fn parse_key(&mut self) -> Result<String, ShorthandError> {
        let start = self.offset;
        let bytes = self.input.as_bytes();
        while let Some(&byte) = bytes.get(self.offset) {
            match byte {
                b'=' => break,
                b',' => {
                    return Err(ShorthandError::MissingEquals {
                        position: start,
                    });
                }
                _ => self.offset += 1,
            }
        }
        if self.offset >= bytes.len() {
            return Err(ShorthandError::MissingEquals {
                position: start,
            });
        }
        let key = self.input[start .. self.offset].trim();
        if key.is_empty() {
            return Err(ShorthandError::EmptyKey {
                position: start,
            });
        }
        self.offset += 1;
        Ok(key.to_string())
    }

    /// Parses a value: an explicit list or a scalar.
    fn parse_value(&mut self) -> Result<Value, ShorthandError> {
        if self.peek() == Some(b'[') {
            return self.parse_list();
        }
        self.parse_scalar()
    }

    /// Parses `[a,b,c]`.
    fn parse_list(&mut self) -> Result<Value, ShorthandError> {
        let start = self.offset;
        let Some(end) = self.input[start ..].find(']').map(|index| start + index) else {
            return Err(ShorthandError::Unterminated {
                delimiter: '[',
                position: start,
            });
        };
        let body = &self.input[start + 1 .. end];
        self.offset = end + 1;
        if body.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(Value::Array(
            body.split(',').map(|item| Value::String(unquote(item.trim()).to_string())).collect(),
        ))
    }

    /// Parses a quoted or bare scalar.
    fn parse_scalar(&mut self) -> Result<Value, ShorthandError> {
        let start = self.offset;
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let body_start = start + 1;
                let found = self.input[body_start ..].find(char::from(quote));
                let Some(end) = found.map(|index| body_start + index) else {
                    return Err(ShorthandError::Unterminated {
                        delimiter: char::from(quote),
                        position: start,
                    });
                };
                self.offset = end + 1;
                Ok(Value::String(self.input[body_start .. end].to_string()))
            }
            Some(b'{') => Err(ShorthandError::NestedStructure {
                position: start,
            }),
            _ => {
                let end =
                    self.input[start ..].find(',').map_or(self.input.len(), |index| start + index);
                self.offset = end;
                Ok(Value::String(self.input[start .. end].trim().to_string()))
            }
        }
    }

    /// Returns true when the segment after the current comma starts a new key.
    fn next_segment_is_key(&self) -> bool {
        let rest = &self.input[self.offset + 1 ..];
        let segment_end = rest.find(',').unwrap_or(rest.len());
        let segment = &rest[.. segment_end];
        segment.find('=').is_some_and(|equals| {
            let key = segment[.. equals].trim();
            !key.is_empty() && !key.starts_with(['"', '\'', '['])
        })
    }

    /// Returns the current byte.
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.offset).copied()
    }
}

/// Appends a scalar to a value, promoting scalars to lists.
fn append(value: Value, extra: Value) -> Value {
    match value {
        Value::Array(mut items) => {
            items.push(extra);
            Value::Array(items)
        }
        other => Value::Array(vec![other, extra]),
    }
}

/// Strips one layer of matching quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner;
        }
    }
    text
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

    use serde_json::json;

    use super::*;

    #[test]
    fn key_value_pairs_become_an_object() {
        let map = parse_shorthand("Name=instance-state-name,Values=running").unwrap();
        assert_eq!(
            Value::Object(map),
            json!({ "Name": "instance-state-name", "Values": "running" })
        );
    }

    #[test]
    fn trailing_bare_segments_continue_a_list() {
        let map = parse_shorthand("Key=IpAddress,Values=1.0.0.1,1.0.0.2,Type=Equal").unwrap();
        assert_eq!(
            Value::Object(map),
            json!({ "Key": "IpAddress", "Values": ["1.0.0.1", "1.0.0.2"], "Type": "Equal" })
        );
    }

    #[test]
    fn bracketed_and_quoted_values() {
        let map = parse_shorthand(r#"Values=[a,"b"],Name="x,y""#).unwrap();
        assert_eq!(Value::Object(map), json!({ "Values": ["a", "b"], "Name": "x,y" }));
    }

    #[test]
    fn malformed_shorthand_is_rejected() {
        assert_eq!(parse_shorthand(""), Err(ShorthandError::Empty));
        assert!(matches!(parse_shorthand("Name"), Err(ShorthandError::MissingEquals { .. })));
        assert!(matches!(parse_shorthand("=x"), Err(ShorthandError::EmptyKey { .. })));
        assert!(matches!(parse_shorthand("A=1,A=2"), Err(ShorthandError::DuplicateKey { .. })));
        assert!(matches!(parse_shorthand("A=[1,2"), Err(ShorthandError::Unterminated { .. })));
        assert!(matches!(parse_shorthand("A={B=1}"), Err(ShorthandError::NestedStructure { .. })));
    }

    #[test]
    fn shorthand_detection() {
        assert!(looks_like_shorthand("Name=a,Values=b"));
        assert!(!looks_like_shorthand("a,b=c"));
        assert!(!looks_like_shorthand("plain"));
    }
}
