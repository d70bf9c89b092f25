//! Blocking adapter over a runtime-owned Tokio executor.
//!
//! Synchronous hosts cannot drive futures themselves. [`BlockingRuntime`]
//! owns a multi-thread Tokio runtime and runs every bridged future as a task
//! on its worker threads. The calling thread only waits for the task's final
//! result; it never polls intermediate continuations, so a host that pumps
//! no events of its own cannot deadlock the operation.
//!
//! # Usage restrictions
//!
//! [`BlockingRuntime::run`] must not be called from inside an asynchronous
//! context. Doing so would park a Tokio worker while it waits on another
//! task. The call is detected and rejected with
//! [`RuntimeError::NestedRuntime`] instead of panicking.
//!
//! ```rust
//! use core_async::runtime::BlockingRuntime;
//!
//! let runtime = BlockingRuntime::new(2).unwrap();
//! let value = runtime.run(async { 40 + 2 }).unwrap();
//! assert_eq!(value, 42);
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tracing::{debug, error};

use tokio::runtime::{Builder, Handle, Runtime};

const THREAD_NAME: &str = "remote-bridge-worker";

/// Failures raised by the blocking adapter itself (never by the bridged
/// operation, whose own result is returned as-is).
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to start bridge runtime: {0}")]
    Startup(#[from] std::io::Error),

    #[error("Blocking call issued from inside an async context: {0}")]
    NestedRuntime(String),

    #[error("Bridged task panicked: {0}")]
    TaskPanicked(String),

    #[error("Bridged task was cancelled")]
    TaskCancelled,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Runtime-owned executor exposing blocking entry points.
pub struct BlockingRuntime {
    runtime: Runtime,
    worker_threads: usize,
    in_flight: AtomicUsize,
}

impl BlockingRuntime {
    /// Build a runtime with the given number of worker threads (at least one).
    pub fn new(worker_threads: usize) -> Result<Self> {
        let worker_threads = worker_threads.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .enable_all()
            .thread_name(THREAD_NAME)
            .build()?;

        debug!(worker_threads, "Bridge runtime started");

        Ok(Self {
            runtime,
            worker_threads,
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Run `future` to completion on a worker and block until it finishes.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NestedRuntime`] when called from an async context
    /// - [`RuntimeError::TaskPanicked`] when the future panics
    pub fn run<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if let Ok(handle) = Handle::try_current() {
            return Err(RuntimeError::NestedRuntime(format!(
                "runtime {:?} is active on the calling thread",
                handle.id()
            )));
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let task = self.runtime.spawn(future);
        // Only the join handle is polled here; the work itself stays on the
        // runtime's workers.
        let joined = self.runtime.block_on(task);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        joined.map_err(|err| {
            if err.is_panic() {
                let reason = panic_message(err.into_panic());
                error!(reason = %reason, "Bridged task panicked");
                RuntimeError::TaskPanicked(reason)
            } else {
                RuntimeError::TaskCancelled
            }
        })
    }

    /// Number of worker threads backing this runtime.
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Number of blocking calls currently waiting on a result.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for BlockingRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingRuntime")
            .field("worker_threads", &self.worker_threads)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
