// crates/aws-api-gate-config/src/lib.rs
// ============================================================================
// Module: AWS API Gate Config
// Description: Canonical configuration model for the command gate.
// Purpose: Load, override, and validate gate settings from TOML and env.
// Dependencies: aws-api-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Single source of truth for `aws-api-gate.toml`. The file is optional;
//! environment variables override file values, and the merged result is
//! validated fail-closed before any component is built from it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
