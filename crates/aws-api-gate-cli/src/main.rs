// crates/aws-api-gate-cli/src/main.rs
// ============================================================================
// Module: AWS API Gate CLI Entry Point
// Description: Command dispatcher for gated AWS CLI command execution.
// Purpose: Translate, validate, classify, and run AWS CLI commands safely.
// Dependencies: clap, aws-api-gate-config, aws-api-gate-core, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! `aws-api-gate` exposes the command pipeline on the command line. The
//! offline subcommands inspect a command against the schema catalog without
//! touching AWS; `call` runs it through the full gate. Every result is
//! written to stdout as canonical JSON; errors go to stderr with a failure
//! exit code.
//! Security posture: command text is untrusted input.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use aws_api_gate_cli::wiring::build_gate;
use aws_api_gate_cli::wiring::catalog_summary;
use aws_api_gate_cli::wiring::load_catalog;
use aws_api_gate_cli::wiring::read_only_report;
use aws_api_gate_config::AwsApiGateConfig;
use aws_api_gate_core::translate_cli_to_ir;
use aws_api_gate_core::validate;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "aws-api-gate", version, disable_help_subcommand = true)]
struct Cli {
    /// Optional config file path (defaults to aws-api-gate.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command through translation, validation, policy, and execution.
    Call(CallCommand),
    /// Print the translated intermediate representation of a command.
    Translate(CommandArg),
    /// Validate a command against the schema catalog.
    Validate(CommandArg),
    /// Report whether a command is allowed in read-only mode.
    ReadOnly(CommandArg),
    /// Describe the schema catalog.
    Catalog(CatalogCommand),
}

/// Arguments for the `call` command.
#[derive(Args, Debug)]
struct CallCommand {
    /// Full AWS CLI command text, starting with `aws`.
    #[arg(value_name = "COMMAND")]
    command: String,
    /// Limit on the number of returned items.
    #[arg(long, value_name = "N")]
    max_results: Option<u32>,
}

/// A single command text argument.
#[derive(Args, Debug)]
struct CommandArg {
    /// Full AWS CLI command text, starting with `aws`.
    #[arg(value_name = "COMMAND")]
    command: String,
}

/// Arguments for the `catalog` command.
#[derive(Args, Debug)]
struct CatalogCommand {
    /// Show operations and parameters of one service.
    #[arg(long, value_name = "SERVICE")]
    service: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = AwsApiGateConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    match cli.command {
        Commands::Call(command) => command_call(&config, &command),
        Commands::Translate(command) => command_translate(&config, &command),
        Commands::Validate(command) => command_validate(&config, &command),
        Commands::ReadOnly(command) => command_read_only(&config, &command),
        Commands::Catalog(command) => command_catalog(&config, &command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `call` command.
fn command_call(config: &AwsApiGateConfig, command: &CallCommand) -> CliResult<ExitCode> {
    let gate = build_gate(config).map_err(|err| CliError::new(err.to_string()))?;
    let outcome = gate.call(&command.command, command.max_results);
    write_canonical_json(&outcome)?;
    Ok(exit_code(!outcome.is_error()))
}

/// Executes the `translate` command.
fn command_translate(config: &AwsApiGateConfig, command: &CommandArg) -> CliResult<ExitCode> {
    let catalog = load_catalog(config).map_err(|err| CliError::new(err.to_string()))?;
    let ir = translate_cli_to_ir(&catalog, &command.command)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_canonical_json(&ir)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `validate` command.
fn command_validate(config: &AwsApiGateConfig, command: &CommandArg) -> CliResult<ExitCode> {
    let catalog = load_catalog(config).map_err(|err| CliError::new(err.to_string()))?;
    let ir = translate_cli_to_ir(&catalog, &command.command)
        .map_err(|err| CliError::new(err.to_string()))?;
    let response = validate(&ir);
    write_canonical_json(&response)?;
    Ok(exit_code(!response.validation_failed()))
}

/// Executes the `read-only` command.
fn command_read_only(config: &AwsApiGateConfig, command: &CommandArg) -> CliResult<ExitCode> {
    let catalog = load_catalog(config).map_err(|err| CliError::new(err.to_string()))?;
    let report = read_only_report(&catalog, &command.command)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_canonical_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `catalog` command.
fn command_catalog(config: &AwsApiGateConfig, command: &CatalogCommand) -> CliResult<ExitCode> {
    let catalog = load_catalog(config).map_err(|err| CliError::new(err.to_string()))?;
    let summary = catalog_summary(&catalog, command.service.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    write_canonical_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Maps a pipeline result to the process exit code.
const fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Serializes a value as one line of canonical JSON.
fn canonical_json_line<T: Serialize>(value: &T) -> CliResult<Vec<u8>> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes canonical JSON to stdout.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let bytes = canonical_json_line(value)?;
    let mut stdout = std::io::stdout();
    stdout
        .write_all(&bytes)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
