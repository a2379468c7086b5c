// crates/aws-api-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Command Audit Logging
// Description: Structured audit events for command handling.
// Purpose: Emit redacted JSON-line audit records without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every gated command produces one audit event describing where the
//! pipeline stopped and why. Raw command text, parameter values and
//! credentials are never recorded. Sinks write JSON lines so deployments can
//! route events to their preferred logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Pipeline stage a command reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStage {
    /// Text to IR translation.
    Parsing,
    /// Schema validation and policy checks.
    Validating,
    /// Customization driver dispatch.
    Customization,
    /// Direct API call dispatch.
    DirectCall,
    /// Completed.
    Terminal,
}

/// Outcome classification for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command executed and returned a result.
    Executed,
    /// The command failed validation.
    Rejected,
    /// The read-only policy blocked the command.
    Denied,
    /// Execution failed.
    Failed,
}

/// Command audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct CommandAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// SDK service name when resolved.
    pub service: Option<String>,
    /// SDK operation name when resolved.
    pub operation: Option<String>,
    /// Resolved region when known.
    pub region: Option<String>,
    /// Stage the command reached.
    pub stage: ExecutionStage,
    /// Outcome classification.
    pub outcome: CommandOutcome,
    /// Status code of a direct call.
    pub status_code: Option<u16>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Whether read-only mode was enforced.
    pub read_only: bool,
    /// Redaction classification for payload logging.
    pub redaction: &'static str,
}

/// Inputs required to construct a command audit event.
pub struct CommandAuditEventParams {
    /// SDK service name when resolved.
    pub service: Option<String>,
    /// SDK operation name when resolved.
    pub operation: Option<String>,
    /// Resolved region when known.
    pub region: Option<String>,
    /// Stage the command reached.
    pub stage: ExecutionStage,
    /// Outcome classification.
    pub outcome: CommandOutcome,
    /// Status code of a direct call.
    pub status_code: Option<u16>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Whether read-only mode was enforced.
    pub read_only: bool,
}

impl CommandAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: CommandAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "aws_command",
            timestamp_ms,
            service: params.service,
            operation: params.operation,
            region: params.region,
            stage: params.stage,
            outcome: params.outcome,
            status_code: params.status_code,
            error_kind: params.error_kind,
            read_only: params.read_only,
            redaction: "command_text_omitted",
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for command events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &CommandAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &CommandAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &CommandAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &CommandAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
