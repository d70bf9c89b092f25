//! Async plumbing for the remote bridge.
//!
//! The bridge talks to its collaborators through async APIs (reqwest, the AWS
//! SDK) but is driven by a synchronous, single-threaded host. This crate
//! holds the pieces that sit on that seam:
//!
//! - `runtime`: [`BlockingRuntime`](runtime::BlockingRuntime), the blocking
//!   adapter that runs futures on runtime-owned workers
//! - `io`: async I/O traits used for streamed bodies
//! - `sync`: async-aware locks
//!
//! All `core-*` and `bridge-*` crates depend on this crate instead of naming
//! Tokio directly for these concerns.

pub mod io;
pub mod runtime;
pub mod sync;

pub use runtime::{BlockingRuntime, RuntimeError};
