//! Synchronization primitives.
//!
//! Async-aware mutex from `tokio::sync`. It is `Send + Sync` and never
//! blocks the executor while waiting, so it may be held across `.await`.
//!
//! ```rust
//! use core_async::sync::Mutex;
//!
//! async fn example() {
//!     let mutex = Mutex::new(42);
//!     let mut guard = mutex.lock().await;
//!     *guard += 1;
//! }
//! ```

pub use tokio::sync::Mutex;
