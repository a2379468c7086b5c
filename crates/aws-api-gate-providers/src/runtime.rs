// crates/aws-api-gate-providers/src/runtime.rs
// ============================================================================
// Module: Provider Runtime Helpers
// Description: Bridges synchronous provider traits onto tokio futures.
// Purpose: Run async credential loading and process I/O from sync callers.
// Dependencies: tokio, thiserror
// ============================================================================

//! ## Overview
//! The core boundary traits are synchronous. Providers own a small tokio
//! runtime and block on it, taking care not to nest `block_on` inside a
//! caller's runtime: on a multi-threaded runtime the current worker is
//! handed over with `block_in_place`, on a current-thread runtime the future
//! runs on a fresh runtime in a helper thread.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;

use thiserror::Error;
use tokio::runtime::Builder;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Worker threads of a provider runtime.
const PROVIDER_WORKER_THREADS: usize = 2;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Runtime construction or bridging failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime could not be built or the helper thread failed.
    #[error("provider runtime unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Runtime Helpers
// ============================================================================

/// Builds the runtime owned by a provider.
///
/// # Errors
///
/// Returns [`RuntimeError::Unavailable`] when tokio cannot start.
pub fn provider_runtime() -> Result<Runtime, RuntimeError> {
    Builder::new_multi_thread()
        .worker_threads(PROVIDER_WORKER_THREADS)
        .thread_name("aws-api-gate-provider")
        .enable_all()
        .build()
        .map_err(|err| RuntimeError::Unavailable(err.to_string()))
}

/// Blocks on a provider future using a compatible runtime.
///
/// # Errors
///
/// Returns [`RuntimeError::Unavailable`] when a helper runtime cannot be
/// started or its thread disappears.
pub fn block_on_with_runtime<F, T>(runtime: &Runtime, future: F) -> Result<T, RuntimeError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return Ok(tokio::task::block_in_place(|| handle.block_on(future)));
        }
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let result = Runtime::new()
                .map_err(|err| RuntimeError::Unavailable(err.to_string()))
                .map(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });
        return rx.recv().unwrap_or_else(|_| {
            Err(RuntimeError::Unavailable("provider thread join failed".to_string()))
        });
    }

    Ok(runtime.block_on(future))
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
    fn blocks_outside_any_runtime() {
        let runtime = provider_runtime().unwrap();
        let value = block_on_with_runtime(&runtime, async { 40 + 2 }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn blocks_from_inside_a_current_thread_runtime() {
        let runtime = provider_runtime().unwrap();
        let outer = Builder::new_current_thread().enable_all().build().unwrap();
        let value = outer.block_on(async { block_on_with_runtime(&runtime, async { 7 }) }).unwrap();
        assert_eq!(value, 7);
        drop(outer);
    }
}
