// crates/aws-api-gate-core/tests/support/mod.rs
// ============================================================================
// Module: Core Test Support
// Description: In-memory transport, driver, credential, and audit fakes.
// ============================================================================
//! ## Overview
//! Fakes record what the pipeline hands them so tests can assert on requests
//! and argument vectors without reaching AWS or spawning processes.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use std::sync::Arc;
use std::sync::Mutex;

use aws_api_gate_core::ApiRequest;
use aws_api_gate_core::ApiResponse;
use aws_api_gate_core::ApiTransport;
use aws_api_gate_core::CredentialError;
use aws_api_gate_core::CredentialProvider;
use aws_api_gate_core::Credentials;
use aws_api_gate_core::CustomizationDriver;
use aws_api_gate_core::DriverError;
use aws_api_gate_core::DriverOutput;
use aws_api_gate_core::Executor;
use aws_api_gate_core::ExecutorConfig;
use aws_api_gate_core::StaticCatalog;
use aws_api_gate_core::TransportError;
use aws_api_gate_core::runtime::AuditSink;
use aws_api_gate_core::runtime::CommandAuditEvent;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Loads the built-in catalog.
pub fn catalog() -> StaticCatalog {
    StaticCatalog::builtin().unwrap()
}

/// Returns fixed test credentials.
pub fn credentials() -> Credentials {
    Credentials {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "secret".to_string(),
        session_token: Some("token".to_string()),
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Reply strategy of the fake transport.
type Reply = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

/// Transport that records requests and answers with a canned reply.
pub struct FakeTransport {
    pub requests: Mutex<Vec<ApiRequest>>,
    pub credentials: Mutex<Vec<Credentials>>,
    reply: Reply,
}

impl FakeTransport {
    /// Answers every call with the payload.
    pub fn returning(payload: Value) -> Arc<Self> {
        Self::with_reply(Box::new(move |_| {
            Ok(ApiResponse {
                payload: payload.clone(),
            })
        }))
    }

    /// Answers every call with an error built by `make`.
    pub fn failing(make: fn() -> TransportError) -> Arc<Self> {
        Self::with_reply(Box::new(move |_| Err(make())))
    }

    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            credentials: Mutex::new(Vec::new()),
            reply,
        })
    }

    /// Returns the recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ApiTransport for FakeTransport {
    fn invoke(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.credentials.lock().unwrap().push(credentials.clone());
        (self.reply)(request)
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Driver that records argument vectors.
pub struct FakeDriver {
    pub calls: Mutex<Vec<Vec<String>>>,
    fail_with: Option<String>,
}

impl FakeDriver {
    /// Driver that echoes its arguments on stdout.
    pub fn echo() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        })
    }

    /// Driver that raises with the message.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        })
    }

    /// Returns the recorded argument vectors.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CustomizationDriver for FakeDriver {
    fn run(&self, args: &[String]) -> Result<DriverOutput, DriverError> {
        self.calls.lock().unwrap().push(args.to_vec());
        match &self.fail_with {
            Some(message) => Err(DriverError::Failed(message.clone())),
            None => Ok(DriverOutput {
                stdout: args.join(" "),
                stderr: String::new(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Credential provider with a fixed answer.
pub struct FakeCredentials {
    pub available: bool,
}

impl CredentialProvider for FakeCredentials {
    fn get_local_credentials(&self) -> Result<Credentials, CredentialError> {
        if self.available { Ok(credentials()) } else { Err(CredentialError::NoCredentials) }
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink that keeps events as JSON values.
#[derive(Default)]
pub struct MemoryAuditSink {
    pub events: Mutex<Vec<Value>>,
}

impl MemoryAuditSink {
    /// Returns the recorded events.
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &CommandAuditEvent) {
        self.events.lock().unwrap().push(serde_json::to_value(event).unwrap_or_else(|_| json!({})));
    }
}

// ============================================================================
// SECTION: Executors
// ============================================================================

/// Builds an executor over the fakes with default configuration.
pub fn executor(
    transport: &Arc<FakeTransport>,
    driver: &Arc<FakeDriver>,
) -> Executor<Arc<FakeTransport>, Arc<FakeDriver>> {
    Executor::new(Arc::clone(transport), Arc::clone(driver), ExecutorConfig::default())
}
