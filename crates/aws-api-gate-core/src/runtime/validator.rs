// crates/aws-api-gate-core/src/runtime/validator.rs
// ============================================================================
// Module: Command Validator
// Description: Schema checks over a translated command.
// Purpose: Report missing required parameters and constraint violations.
// Dependencies: crate::core, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Validation never executes anything. It runs two independent checks and
//! reports both:
//! - **Missing context**: required parameters that were never supplied, as a
//!   single failure in `missing_context_failures`.
//! - **Constraints**: pattern, enum, and range violations of supplied values,
//!   one failure per parameter in `validation_failures`, after any failures
//!   recorded during translation.
//!
//! Patterns use JSON Schema `pattern` semantics and apply to every element
//! of a list parameter. Failure contexts carry the command's `--query`
//! operators and, when known, its region.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use serde_json::json;

use crate::core::catalog::OperationSchema;
use crate::core::catalog::ParameterSchema;
use crate::core::ir::IRTranslation;
use crate::core::models::ProgramInterpretationResponse;
use crate::core::models::ValidationFailure;
use crate::runtime::region::command_region;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Validates a translated command against its operation schema.
///
/// Failure contexts carry the region the command text determines, if any.
#[must_use]
pub fn validate(ir: &IRTranslation) -> ProgramInterpretationResponse {
    let region = ir.command.as_ref().and_then(command_region);
    check(ir, region.as_deref())
}

/// Validates a translated command whose effective region is already resolved.
#[must_use]
pub fn validate_in_region(ir: &IRTranslation, region: &str) -> ProgramInterpretationResponse {
    check(ir, Some(region))
}

/// Runs both checks with failure contexts in the given region.
fn check(ir: &IRTranslation, region: Option<&str>) -> ProgramInterpretationResponse {
    let mut validation_failures = ir.translation_failures.clone();
    let mut missing_context_failures = Vec::new();
    if let Some(operation) = &ir.operation {
        if let Some(failure) = missing_parameters(ir, operation, region) {
            missing_context_failures.push(failure);
        }
        validation_failures.extend(constraint_failures(ir, operation, region));
    }
    ProgramInterpretationResponse::from_failures(validation_failures, missing_context_failures)
}

// ============================================================================
// SECTION: Missing Context
// ============================================================================

/// Builds the missing-parameter failure, if any required flag is absent.
fn missing_parameters(
    ir: &IRTranslation,
    operation: &OperationSchema,
    region: Option<&str>,
) -> Option<ValidationFailure> {
    let missing: Vec<String> = operation
        .required_parameters()
        .filter(|parameter| {
            !ir.parameters.contains_key(&parameter.name) && !ir.flag_supplied(&parameter.flag)
        })
        .map(|parameter| parameter.flag.clone())
        .collect();
    if missing.is_empty() {
        return None;
    }
    let listed = missing.iter().map(|flag| format!("'{flag}'")).collect::<Vec<_>>().join(" ");
    Some(ValidationFailure::new(
        format!(
            "The following parameters are missing for service '{}' and operation '{}': {listed}",
            ir.service_name, ir.operation_name
        ),
        ir.context_in(region).with_parameters(missing),
    ))
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// Checks every supplied parameter with declared constraints.
fn constraint_failures(
    ir: &IRTranslation,
    operation: &OperationSchema,
    region: Option<&str>,
) -> Vec<ValidationFailure> {
    operation
        .parameters
        .iter()
        .filter_map(|parameter| {
            let value = ir.parameters.get(&parameter.name)?;
            let detail = check_parameter(parameter, value)?;
            Some(ValidationFailure::new(
                format!(
                    "The parameter '{}' received an invalid input: \
                     Invalid parameter value: {detail}",
                    parameter.name
                ),
                ir.context_in(region).with_parameters(vec![parameter.flag.clone()]),
            ))
        })
        .collect()
}

/// Returns the first constraint violation of a value.
fn check_parameter(parameter: &ParameterSchema, value: &Value) -> Option<String> {
    let elements: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    if let Some(pattern) = &parameter.pattern {
        let validator = match compile_pattern(pattern) {
            Ok(validator) => validator,
            Err(err) => {
                return Some(format!(
                    "The parameter {} has an unusable pattern: {err}",
                    parameter.name
                ));
            }
        };
        let mismatch = elements
            .iter()
            .filter(|element| element.is_string())
            .any(|element| !validator.is_valid(element));
        if mismatch {
            return Some(format!(
                "The parameter {} does not match the {pattern} pattern",
                parameter.name
            ));
        }
    }
    if !parameter.enum_values.is_empty() {
        let outside = elements.iter().filter_map(|element| element.as_str()).any(|text| {
            !parameter.enum_values.iter().any(|allowed| allowed == text)
        });
        if outside {
            return Some(format!(
                "The parameter {} must be one of: {}",
                parameter.name,
                parameter.enum_values.join(", ")
            ));
        }
    }
    for number in elements.iter().filter_map(|element| element.as_i64()) {
        if let Some(min) = parameter.min
            && number < min
        {
            return Some(format!(
                "The parameter {} must be greater than or equal to {min}",
                parameter.name
            ));
        }
        if let Some(max) = parameter.max
            && number > max
        {
            return Some(format!(
                "The parameter {} must be less than or equal to {max}",
                parameter.name
            ));
        }
    }
    None
}

/// Compiles a string pattern into a JSON Schema validator.
fn compile_pattern(pattern: &str) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&json!({ "type": "string", "pattern": pattern }))
        .map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
