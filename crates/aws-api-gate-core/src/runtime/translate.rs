// crates/aws-api-gate-core/src/runtime/translate.rs
// ============================================================================
// Module: IR Translation
// Description: Turns command text into a typed intermediate representation.
// Purpose: Bind raw flag values to operation parameters by declared type.
// Dependencies: crate::parser, crate::runtime::resolver, serde_json
// ============================================================================

//! ## Overview
//! Translation parses the command, resolves it against the catalog and then
//! converts each raw flag value into typed JSON according to the parameter
//! schema. Problems the user can fix (unknown flags, repeated flags, bad
//! values, stray positional words, unknown operations) are recorded on the IR
//! as translation failures and surface through validation; only structural
//! parse problems and unknown services are returned as [`ParseError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::core::catalog::OperationSchema;
use crate::core::catalog::ParameterSchema;
use crate::core::catalog::ParameterType;
use crate::core::ir::IRTranslation;
use crate::core::models::ValidationFailure;
use crate::core::names::normalize_token;
use crate::interfaces::SchemaCatalog;
use crate::parser::ParseError;
use crate::parser::ParsedArgument;
use crate::parser::parse_command;
use crate::runtime::region::command_region;
use crate::runtime::resolver::Resolution;
use crate::runtime::resolver::ResolveError;
use crate::runtime::resolver::resolve;
use crate::runtime::shorthand::looks_like_shorthand;
use crate::runtime::shorthand::parse_shorthand;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Translates command text into an [`IRTranslation`].
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not a well-formed `aws` command or
/// names an unknown service.
pub fn translate_cli_to_ir<C>(catalog: &C, text: &str) -> Result<IRTranslation, ParseError>
where
    C: SchemaCatalog + ?Sized,
{
    let command = parse_command(text)?;
    let resolution = resolve(catalog, &command.service, &command.operation);
    let region = command_region(&command);
    let mut ir = IRTranslation {
        service_name: normalize_token(&command.service),
        operation_name: normalize_token(&command.operation),
        command: Some(command),
        ..IRTranslation::default()
    };

    match resolution {
        Ok(Resolution::Customization {
            metadata,
        }) => {
            ir.command_metadata = Some(metadata);
            ir.is_customization = true;
        }
        Ok(Resolution::Operation {
            metadata,
            schema,
        }) => {
            ir.command_metadata = Some(metadata);
            let (parameters, failures) = bind_parameters(&ir, &schema, region.as_deref());
            ir.parameters = parameters;
            ir.translation_failures = failures;
            ir.operation = Some(schema);
        }
        Err(ResolveError::UnknownOperation {
            metadata,
            failure,
        }) => {
            ir.command_metadata = Some(metadata);
            ir.translation_failures.push(failure);
        }
        Err(ResolveError::UnknownService {
            service,
        }) => {
            return Err(ParseError::UnknownService {
                service,
                operation: ir.operation_name,
            });
        }
    }
    Ok(ir)
}

// ============================================================================
// SECTION: Parameter Binding
// ============================================================================

/// Binds command arguments to operation parameters.
fn bind_parameters(
    ir: &IRTranslation,
    schema: &OperationSchema,
    region: Option<&str>,
) -> (BTreeMap<String, Value>, Vec<ValidationFailure>) {
    let mut parameters = BTreeMap::new();
    let mut failures = Vec::new();
    let mut seen = BTreeSet::new();
    let Some(command) = &ir.command else {
        return (parameters, failures);
    };

    if !command.positional.is_empty() {
        let listed =
            command.positional.iter().map(|word| format!("'{word}'")).collect::<Vec<_>>().join(" ");
        failures.push(ValidationFailure::new(
            format!(
                "Unexpected positional arguments for service '{}' and operation '{}': {listed}",
                ir.service_name, ir.operation_name
            ),
            ir.context_in(region).with_args(command.positional.clone()),
        ));
    }

    for argument in &command.arguments {
        let Some((parameter, negated)) = lookup_parameter(schema, &argument.flag) else {
            failures.push(ValidationFailure::new(
                format!(
                    "The parameter '{}' is not supported for service '{}' and operation '{}'.",
                    argument.flag, ir.service_name, ir.operation_name
                ),
                ir.context_in(region).with_parameters(vec![argument.flag.clone()]),
            ));
            continue;
        };
        if !seen.insert(parameter.name.clone()) {
            failures.push(ValidationFailure::new(
                format!("The parameter '{}' was specified more than once.", parameter.flag),
                ir.context_in(region).with_parameters(vec![parameter.flag.clone()]),
            ));
            continue;
        }
        match convert_argument(parameter, argument, negated) {
            Ok(value) => {
                parameters.insert(parameter.name.clone(), value);
            }
            Err(detail) => failures.push(ValidationFailure::new(
                format!("The parameter '{}' received an invalid input: {detail}", parameter.name),
                ir.context_in(region)
                    .with_parameters(vec![argument.flag.clone()])
                    .with_args(argument.values.clone()),
            )),
        }
    }
    (parameters, failures)
}

/// Finds the parameter for a flag, honoring `--no-` negation of booleans.
fn lookup_parameter<'a>(
    schema: &'a OperationSchema,
    flag: &str,
) -> Option<(&'a ParameterSchema, bool)> {
    if let Some(parameter) = schema.parameter_by_flag(flag) {
        return Some((parameter, false));
    }
    let positive = flag.strip_prefix("--no-").map(|rest| format!("--{rest}"))?;
    schema
        .parameter_by_flag(&positive)
        .filter(|parameter| parameter.param_type == ParameterType::Boolean)
        .map(|parameter| (parameter, true))
}

// ============================================================================
// SECTION: Value Conversion
// ============================================================================

/// Converts raw values into typed JSON for a parameter.
fn convert_argument(
    parameter: &ParameterSchema,
    argument: &ParsedArgument,
    negated: bool,
) -> Result<Value, String> {
    let values = &argument.values;
    match parameter.param_type {
        ParameterType::Boolean => convert_boolean(values, negated),
        ParameterType::List => convert_list(parameter, values),
        ParameterType::Structure | ParameterType::Map => {
            let raw = single_value(values)?;
            convert_structure(parameter, raw)
        }
        scalar => {
            let raw = single_value(values)?;
            convert_scalar(scalar, raw)
        }
    }
}

/// Requires exactly one raw value.
fn single_value(values: &[String]) -> Result<&str, String> {
    match values {
        [value] => Ok(value.as_str()),
        [] => Err("expected a value but none was provided".to_string()),
        _ => Err(format!("expected a single value but received {}", values.len())),
    }
}

/// Converts a scalar value by declared type.
fn convert_scalar(param_type: ParameterType, raw: &str) -> Result<Value, String> {
    match param_type {
        ParameterType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("'{raw}' is not a valid integer")),
        ParameterType::Double => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("'{raw}' is not a valid number")),
        ParameterType::Boolean => parse_bool(raw).map(Value::Bool),
        ParameterType::String
        | ParameterType::Timestamp
        | ParameterType::Blob
        | ParameterType::List
        | ParameterType::Structure
        | ParameterType::Map => Ok(Value::String(raw.to_string())),
    }
}

/// Converts a boolean flag.
fn convert_boolean(values: &[String], negated: bool) -> Result<Value, String> {
    match values {
        [] => Ok(Value::Bool(!negated)),
        [raw] if !negated => parse_bool(raw).map(Value::Bool),
        _ => Err("boolean flags take no value".to_string()),
    }
}

/// Parses `true` or `false`, case-insensitively.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("'{raw}' is not a valid boolean")),
    }
}

/// Converts list values, accepting JSON arrays and comma shorthand.
fn convert_list(parameter: &ParameterSchema, values: &[String]) -> Result<Value, String> {
    if values.is_empty() {
        return Err("expected at least one value".to_string());
    }
    let member_type = parameter.member_type.unwrap_or(ParameterType::String);
    if let [raw] = values
        && raw.trim_start().starts_with('[')
    {
        let parsed: Value =
            serde_json::from_str(raw).map_err(|err| format!("invalid JSON list: {err}"))?;
        return match parsed {
            Value::Array(_) => Ok(parsed),
            _ => Err("expected a JSON list".to_string()),
        };
    }
    let mut items = Vec::new();
    for raw in values {
        match member_type {
            ParameterType::Structure | ParameterType::Map => {
                items.push(convert_structure(parameter, raw)?);
            }
            scalar => {
                for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
                    items.push(convert_scalar(scalar, part)?);
                }
            }
        }
    }
    Ok(Value::Array(items))
}

/// Converts a JSON or shorthand structure.
fn convert_structure(parameter: &ParameterSchema, raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    let object = if trimmed.starts_with('{') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(object)) => object,
            Ok(_) => return Err("expected a JSON object".to_string()),
            Err(err) => return Err(format!("invalid JSON object: {err}")),
        }
    } else if looks_like_shorthand(trimmed) {
        let parsed = parse_shorthand(trimmed).map_err(|err| err.to_string())?;
        coerce_members(parameter, parsed)?
    } else {
        return Err(format!("'{raw}' is neither JSON nor shorthand syntax"));
    };
    Ok(Value::Object(object))
}

/// Applies declared member types to shorthand values.
fn coerce_members(
    parameter: &ParameterSchema,
    object: Map<String, Value>,
) -> Result<Map<String, Value>, String> {
    let mut coerced = Map::new();
    for (key, value) in object {
        let declared = parameter.members.get(&key).copied();
        let value = match (declared, value) {
            (Some(ParameterType::List), Value::String(text)) => {
                Value::Array(vec![Value::String(text)])
            }
            (
                Some(
                    scalar @ (ParameterType::Integer
                    | ParameterType::Double
                    | ParameterType::Boolean),
                ),
                Value::String(text),
            ) => convert_scalar(scalar, &text)
                .map_err(|detail| format!("member '{key}': {detail}"))?,
            (_, value) => value,
        };
        coerced.insert(key, value);
    }
    Ok(coerced)
}
