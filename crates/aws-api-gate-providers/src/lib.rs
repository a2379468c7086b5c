// crates/aws-api-gate-providers/src/lib.rs
// ============================================================================
// Module: AWS API Gate Providers
// Description: Concrete credential, transport, and driver implementations.
// Purpose: Connect the core pipeline to aws-config and the AWS CLI binary.
// Dependencies: aws-api-gate-core, aws-config, aws-credential-types, tokio
// ============================================================================

//! ## Overview
//! This crate implements the core boundary traits:
//! - [`AwsConfigCredentialProvider`] resolves local credentials through the
//!   aws-config default chain.
//! - [`AwsCliTransport`] performs direct API calls as single AWS CLI
//!   invocations with explicit region, timeout and credentials.
//! - [`AwsCliDriver`] runs client-side customization commands.
//!
//! Each provider owns a small tokio runtime and exposes a synchronous API.
//! Security posture: child output is untrusted and size-limited, credentials
//! never appear on a command line.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod credentials;
pub mod driver;
pub mod process;
pub mod runtime;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use credentials::AwsConfigCredentialProvider;
pub use driver::AwsCliDriver;
pub use driver::DEFAULT_DRIVER_TIMEOUT;
pub use process::CliProcessConfig;
pub use process::DEFAULT_CLI_PATH;
pub use process::DEFAULT_MAX_OUTPUT_BYTES;
pub use transport::AwsCliTransport;
pub use transport::DEFAULT_STARTUP_GRACE;
