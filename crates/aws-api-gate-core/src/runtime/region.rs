// crates/aws-api-gate-core/src/runtime/region.rs
// ============================================================================
// Module: Region Resolver
// Description: Effective execution region for a translated command.
// Purpose: Pick the region from flags, resource ARNs, or the caller default.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Precedence, highest first:
//! 1. An explicit `--region` option.
//! 2. The region segment of an ARN found in any argument value.
//! 3. The caller-supplied default.
//!
//! Global-service ARNs have an empty region segment and fall through to the
//! default. Resolution is a pure function of the IR and the default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ir::IRTranslation;
use crate::parser::ParsedCommand;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Region used when the caller's default is blank.
pub const FALLBACK_REGION: &str = "us-east-1";

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Resolves the effective region of a command. Never returns an empty string.
#[must_use]
pub fn resolve_region(ir: &IRTranslation, default_region: &str) -> String {
    if let Some(region) = ir.command.as_ref().and_then(command_region) {
        return region;
    }
    let default_region = default_region.trim();
    if default_region.is_empty() {
        FALLBACK_REGION.to_string()
    } else {
        default_region.to_string()
    }
}

/// Returns the region the command text itself determines, if any.
#[must_use]
pub fn command_region(command: &ParsedCommand) -> Option<String> {
    if let Some(region) = command.global.region.as_deref().map(str::trim)
        && !region.is_empty()
    {
        return Some(region.to_string());
    }
    command.argument_values().find_map(region_from_arns)
}

/// Returns the first valid ARN region segment embedded in the text.
#[must_use]
pub fn region_from_arns(text: &str) -> Option<String> {
    text.match_indices("arn:").find_map(|(start, _)| {
        let mut segments = text[start ..].splitn(5, ':');
        let _arn = segments.next();
        let _partition = segments.next()?;
        let _service = segments.next()?;
        let candidate = segments.next()?;
        let candidate: String = candidate
            .chars()
            .take_while(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
            .collect();
        is_region_name(&candidate).then_some(candidate)
    })
}

/// Returns true for region names such as `eu-west-2` or `us-gov-west-1`.
#[must_use]
pub fn is_region_name(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate.split('-').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return false;
    };
    first.len() == 2
        && first.chars().all(|ch| ch.is_ascii_lowercase())
        && !middle.is_empty()
        && middle
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_lowercase()))
        && !last.is_empty()
        && last.chars().all(|ch| ch.is_ascii_digit())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
