// crates/aws-api-gate-cli/src/lib.rs
// ============================================================================
// Module: AWS API Gate CLI Library
// Description: Shared helpers for the AWS API Gate command-line interface.
// Purpose: Build pipeline components from configuration for the binary and tests.
// Dependencies: aws-api-gate-config, aws-api-gate-core, aws-api-gate-providers
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) parses arguments and renders
//! output; this library assembles the catalog, audit sink, providers, and
//! command gate from a validated configuration so the wiring is testable
//! without spawning the binary.
//!
//! Security posture: command text is untrusted and only reaches the AWS CLI
//! after translation, validation, and the read-only gate.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Component assembly from configuration.
pub mod wiring;
