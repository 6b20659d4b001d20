//! Per-test scoped execution contexts.
//!
//! Each test gets a fresh single-threaded async runtime that cannot leak
//! into other tests. The scope publishes its handle into a thread-local
//! ambient slot while active; release drains pending work, finalizes the
//! runtime, and clears the slot so a later test cannot observe a stale
//! context. Release is idempotent and also runs on drop, covering every
//! exit path including panics.

use std::cell::RefCell;

use provust_common::constants::DRAIN_TIMEOUT;
use provust_common::error::{ProvustError, Result};
use tokio::runtime::{Builder, Handle, Runtime};

thread_local! {
    static AMBIENT: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

/// Returns the handle of the currently active scope on this thread.
#[must_use]
pub fn ambient_handle() -> Option<Handle> {
    AMBIENT.with(|slot| slot.borrow().clone())
}

/// An isolated async execution context with guaranteed cleanup.
#[derive(Debug)]
pub struct ExecutionScope {
    runtime: Option<Runtime>,
}

impl ExecutionScope {
    /// Builds a fresh current-thread runtime and makes it ambient.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be constructed.
    pub fn acquire() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProvustError::Config {
                message: format!("failed to build execution context: {e}"),
            })?;
        AMBIENT.with(|slot| {
            *slot.borrow_mut() = Some(runtime.handle().clone());
        });
        tracing::debug!("execution scope acquired");
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Runs a future to completion on this scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope was already released.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output> {
        match &self.runtime {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(ProvustError::Config {
                message: "execution scope already released".to_string(),
            }),
        }
    }

    /// Returns this scope's runtime handle while it is active.
    #[must_use]
    pub fn handle(&self) -> Option<Handle> {
        self.runtime.as_ref().map(|rt| rt.handle().clone())
    }

    /// Returns whether the scope has been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.runtime.is_none()
    }

    /// Drains pending work and finalizes the context.
    ///
    /// Idempotent: releasing an already-released scope is a no-op and
    /// never fails. The ambient slot is cleared unconditionally.
    pub fn release(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // One last turn of the scheduler so work the test queued gets
            // a chance to run before the context is torn down.
            runtime.block_on(tokio::task::yield_now());
            runtime.shutdown_timeout(DRAIN_TIMEOUT);
            tracing::debug!("execution scope released");
        }
        AMBIENT.with(|slot| {
            *slot.borrow_mut() = None;
        });
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        self.release();
    }
}
