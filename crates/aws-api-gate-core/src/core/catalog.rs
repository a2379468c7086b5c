// crates/aws-api-gate-core/src/core/catalog.rs
// ============================================================================
// Module: Schema Catalog
// Description: Service, operation, and parameter schemas loaded from data files.
// Purpose: Back command resolution and validation with a read-only lookup table.
// Dependencies: jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! The catalog is the pipeline's view of the AWS API surface. It is loaded
//! once from a versioned JSON document, checked for internal consistency
//! (unique names, unique flags, compilable patterns) and never mutated after
//! construction. A built-in catalog is embedded in the crate; deployments can
//! point at a larger generated document instead.
//!
//! Security posture: catalog files are operator input and are size-limited
//! and validated fail-closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use jsonschema::Draft;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::core::models::ReadOnlyOperations;
use crate::core::names::flag_for_parameter;
use crate::core::names::normalize_token;
use crate::core::names::pascal_to_kebab;
use crate::interfaces::SchemaCatalog;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum catalog document size in bytes.
pub const MAX_CATALOG_BYTES: usize = 8 * 1024 * 1024;
/// Built-in catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

// ============================================================================
// SECTION: Schema Types
// ============================================================================

/// Declared type of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Single string value.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Double,
    /// Presence flag with optional `--no-` negation.
    Boolean,
    /// Timestamp kept in its textual form.
    Timestamp,
    /// Binary payload kept in its textual form.
    Blob,
    /// Ordered list of members.
    List,
    /// Structure with named members.
    Structure,
    /// Free-form string map.
    Map,
}

/// Schema of a single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSchema {
    /// Canonical `PascalCase` name used in API payloads and messages.
    pub name: String,
    /// CLI flag; derived from `name` when omitted.
    #[serde(default)]
    pub flag: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Value pattern (applies to each element of a list).
    #[serde(default)]
    pub pattern: Option<String>,
    /// Allowed values.
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
    /// Inclusive lower bound for integers.
    #[serde(default)]
    pub min: Option<i64>,
    /// Inclusive upper bound for integers.
    #[serde(default)]
    pub max: Option<i64>,
    /// Element type for lists.
    #[serde(default)]
    pub member_type: Option<ParameterType>,
    /// Declared member types for structures.
    #[serde(default)]
    pub members: BTreeMap<String, ParameterType>,
}

/// Schema of a single API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationSchema {
    /// Canonical SDK operation name.
    pub sdk_name: String,
    /// CLI command name; derived from `sdk_name` when omitted.
    #[serde(default)]
    pub cli_name: String,
    /// Whether the operation is non-mutating.
    #[serde(default)]
    pub read_only: bool,
    /// Whether the CLI paginates the operation and accepts `--max-items`.
    #[serde(default)]
    pub paginated: bool,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
}

impl OperationSchema {
    /// Finds a parameter by its CLI flag.
    #[must_use]
    pub fn parameter_by_flag(&self, flag: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|parameter| parameter.flag == flag)
    }

    /// Finds a parameter by its canonical name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    /// Iterates over required parameters in declaration order.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSchema> {
        self.parameters.iter().filter(|parameter| parameter.required)
    }
}

/// A service and its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSchema {
    /// CLI namespace (`s3api`, `ec2`).
    pub cli_name: String,
    /// Canonical SDK name (`s3`, `ec2`).
    pub sdk_name: String,
    /// Human-readable service name.
    pub full_name: String,
    /// Operations keyed by CLI name.
    pub operations: BTreeMap<String, Arc<OperationSchema>>,
}

/// Client-side commands of a CLI namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationSchema {
    /// CLI namespace (`s3`, `configure`).
    pub cli_name: String,
    /// SDK name used for policy lookups.
    pub sdk_name: String,
    /// Human-readable name.
    pub full_name: String,
    /// Customization command names.
    pub commands: Vec<String>,
    /// Commands that do not mutate remote state.
    #[serde(default)]
    pub read_only: Vec<String>,
}

impl CustomizationSchema {
    /// Returns true when the namespace defines the command.
    #[must_use]
    pub fn has_command(&self, command: &str) -> bool {
        self.commands.iter().any(|candidate| candidate == command)
    }
}

// ============================================================================
// SECTION: Catalog Document
// ============================================================================

/// Service entry as it appears in the catalog document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceDocument {
    /// CLI namespace.
    cli_name: String,
    /// SDK name.
    sdk_name: String,
    /// Human-readable name.
    full_name: String,
    /// Operations.
    #[serde(default)]
    operations: Vec<OperationSchema>,
}

/// Top-level catalog document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    /// Document format version.
    version: String,
    /// Services.
    #[serde(default)]
    services: Vec<ServiceDocument>,
    /// Customization namespaces.
    #[serde(default)]
    customizations: Vec<CustomizationSchema>,
}

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("catalog io error: {0}")]
    Io(String),
    /// Catalog document is not valid JSON for the expected shape.
    #[error("catalog parse error: {0}")]
    Parse(String),
    /// Catalog document exceeds the size limit.
    #[error("catalog exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual document size.
        actual_bytes: usize,
    },
    /// Catalog content is internally inconsistent.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Static Catalog
// ============================================================================

/// Immutable catalog built from a catalog document.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    /// Document version.
    version: String,
    /// Services keyed by CLI namespace.
    services: BTreeMap<String, ServiceSchema>,
    /// Customizations keyed by CLI namespace.
    customizations: BTreeMap<String, CustomizationSchema>,
}

impl StaticCatalog {
    /// Loads the catalog embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the embedded document is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Loads a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read, is too large, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path).map_err(|err| CatalogError::Io(err.to_string()))?;
        if bytes.len() > MAX_CATALOG_BYTES {
            return Err(CatalogError::TooLarge {
                max_bytes: MAX_CATALOG_BYTES,
                actual_bytes: bytes.len(),
            });
        }
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| CatalogError::Parse("catalog must be utf-8".to_string()))?;
        Self::from_json(text)
    }

    /// Builds a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the document is malformed or inconsistent.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        if text.len() > MAX_CATALOG_BYTES {
            return Err(CatalogError::TooLarge {
                max_bytes: MAX_CATALOG_BYTES,
                actual_bytes: text.len(),
            });
        }
        let document: CatalogDocument =
            serde_json::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::from_document(document)
    }

    /// Validates and indexes a parsed document.
    fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        if document.version.trim().is_empty() {
            return Err(CatalogError::Invalid("version must be non-empty".to_string()));
        }
        let mut services = BTreeMap::new();
        for service in document.services {
            let schema = build_service(service)?;
            if services.contains_key(&schema.cli_name) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate service '{}'",
                    schema.cli_name
                )));
            }
            services.insert(schema.cli_name.clone(), schema);
        }
        let mut customizations = BTreeMap::new();
        for mut customization in document.customizations {
            customization.cli_name = normalize_token(&customization.cli_name);
            require_name("customization", &customization.cli_name)?;
            require_name("customization sdk_name", &customization.sdk_name)?;
            let commands: BTreeSet<&String> = customization.commands.iter().collect();
            if commands.len() != customization.commands.len() {
                return Err(CatalogError::Invalid(format!(
                    "duplicate command in customization '{}'",
                    customization.cli_name
                )));
            }
            if let Some(unknown) =
                customization.read_only.iter().find(|name| !commands.contains(name))
            {
                return Err(CatalogError::Invalid(format!(
                    "read-only command '{unknown}' is not a command of customization '{}'",
                    customization.cli_name
                )));
            }
            if customizations.contains_key(&customization.cli_name) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate customization '{}'",
                    customization.cli_name
                )));
            }
            customizations.insert(customization.cli_name.clone(), customization);
        }
        Ok(Self {
            version: document.version,
            services,
            customizations,
        })
    }

    /// Returns the document version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Iterates over services in CLI-name order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceSchema> {
        self.services.values()
    }

    /// Iterates over customization namespaces in CLI-name order.
    pub fn customizations(&self) -> impl Iterator<Item = &CustomizationSchema> {
        self.customizations.values()
    }
}

impl SchemaCatalog for StaticCatalog {
    fn service(&self, token: &str) -> Option<&ServiceSchema> {
        self.services.get(&normalize_token(token))
    }

    fn operation(&self, service: &str, operation: &str) -> Option<Arc<OperationSchema>> {
        self.service(service)?.operations.get(&normalize_token(operation)).cloned()
    }

    fn customization(&self, service: &str) -> Option<&CustomizationSchema> {
        self.customizations.get(&normalize_token(service))
    }

    fn read_only_operations(&self) -> ReadOnlyOperations {
        let mut table = ReadOnlyOperations::new();
        for service in self.services.values() {
            for operation in service.operations.values().filter(|operation| operation.read_only) {
                table.insert(&service.sdk_name, &operation.cli_name);
            }
        }
        for customization in self.customizations.values() {
            for command in &customization.read_only {
                table.insert(&customization.sdk_name, command);
            }
        }
        table
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates and indexes one service entry.
fn build_service(document: ServiceDocument) -> Result<ServiceSchema, CatalogError> {
    let cli_name = normalize_token(&document.cli_name);
    require_name("service", &cli_name)?;
    require_name("service sdk_name", &document.sdk_name)?;
    require_name("service full_name", &document.full_name)?;
    let mut operations = BTreeMap::new();
    for mut operation in document.operations {
        require_name("operation", &operation.sdk_name)?;
        operation.cli_name = if operation.cli_name.trim().is_empty() {
            pascal_to_kebab(&operation.sdk_name)
        } else {
            normalize_token(&operation.cli_name)
        };
        let mut flags = BTreeSet::new();
        let mut names = BTreeSet::new();
        for parameter in &mut operation.parameters {
            require_name("parameter", &parameter.name)?;
            if parameter.flag.trim().is_empty() {
                parameter.flag = flag_for_parameter(&parameter.name);
            }
            if !flags.insert(parameter.flag.clone()) || !names.insert(parameter.name.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate parameter '{}' in {cli_name} {}",
                    parameter.name, operation.cli_name
                )));
            }
            check_parameter(parameter)?;
        }
        if operations.contains_key(&operation.cli_name) {
            return Err(CatalogError::Invalid(format!(
                "duplicate operation '{}' in service '{cli_name}'",
                operation.cli_name
            )));
        }
        operations.insert(operation.cli_name.clone(), Arc::new(operation));
    }
    Ok(ServiceSchema {
        cli_name,
        sdk_name: document.sdk_name,
        full_name: document.full_name,
        operations,
    })
}

/// Checks declared constraints for consistency.
fn check_parameter(parameter: &ParameterSchema) -> Result<(), CatalogError> {
    if let (Some(min), Some(max)) = (parameter.min, parameter.max)
        && min > max
    {
        return Err(CatalogError::Invalid(format!(
            "parameter '{}' has min greater than max",
            parameter.name
        )));
    }
    if let Some(pattern) = &parameter.pattern {
        jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&json!({ "type": "string", "pattern": pattern }))
            .map_err(|err| {
                CatalogError::Invalid(format!(
                    "parameter '{}' has an invalid pattern: {err}",
                    parameter.name
                ))
            })?;
    }
    Ok(())
}

/// Rejects empty names.
fn require_name(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Invalid(format!("{field} name must be non-empty")));
    }
    Ok(())
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
    fn builtin_catalog_loads() {
        let catalog = StaticCatalog::builtin().unwrap();
        assert!(!catalog.version().is_empty());
        let sts = catalog.service("STS").unwrap();
        assert_eq!(sts.full_name, "AWS Security Token Service");
        let operation = catalog.operation("sts", "get-caller-identity").unwrap();
        assert_eq!(operation.sdk_name, "GetCallerIdentity");
        assert!(!operation.paginated);
        assert!(catalog.operation("ec2", "describe-instances").unwrap().paginated);
    }

    #[test]
    fn derived_flags_and_cli_names_are_filled_in() {
        let catalog = StaticCatalog::builtin().unwrap();
        let operation = catalog.operation("cloud9", "create-environment-ec2").unwrap();
        assert!(operation.parameter_by_flag("--image-id").is_some());
        let operation = catalog.operation("cloudwatch", "list-managed-insight-rules").unwrap();
        assert_eq!(operation.parameter_by_flag("--resource-arn").unwrap().name, "ResourceARN");
    }

    #[test]
    fn read_only_table_merges_services_and_customizations() {
        let table = StaticCatalog::builtin().unwrap().read_only_operations();
        assert!(table.has("s3", "ListBuckets"));
        assert!(table.has("s3", "ls"));
        assert!(!table.has("s3", "cp"));
        assert!(!table.has("ec2", "RevokeSecurityGroupIngress"));
    }

    #[test]
    fn duplicate_operations_are_rejected() {
        let document = r#"{
            "version": "1",
            "services": [{
                "cli_name": "sts", "sdk_name": "sts", "full_name": "STS",
                "operations": [
                    { "sdk_name": "GetCallerIdentity" },
                    { "sdk_name": "GetCallerIdentity" }
                ]
            }]
        }"#;
        let err = StaticCatalog::from_json(document).unwrap_err();
        assert!(err.to_string().contains("duplicate operation"));
    }

    #[test]
    fn invalid_patterns_fail_closed() {
        let document = r#"{
            "version": "1",
            "services": [{
                "cli_name": "ec2", "sdk_name": "ec2", "full_name": "EC2",
                "operations": [{
                    "sdk_name": "DescribeInstances",
                    "parameters": [{ "name": "InstanceIds", "type": "list", "pattern": "^(i-" }]
                }]
            }]
        }"#;
        let err = StaticCatalog::from_json(document).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn oversized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, vec![b' '; MAX_CATALOG_BYTES + 1]).unwrap();
        let err = StaticCatalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::TooLarge { .. }));
    }

    #[test]
    fn unknown_read_only_customization_commands_are_rejected() {
        let document = r#"{
            "version": "1",
            "customizations": [{
                "cli_name": "s3", "sdk_name": "s3", "full_name": "S3",
                "commands": ["ls"], "read_only": ["cp"]
            }]
        }"#;
        assert!(StaticCatalog::from_json(document).is_err());
    }
}
