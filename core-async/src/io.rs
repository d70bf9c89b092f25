//! Async I/O traits used by the bridge collaborators.
//!
//! Re-exports Tokio's I/O traits so that `bridge-traits` and `core-service`
//! never name Tokio directly when describing streamed bodies.

pub use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
