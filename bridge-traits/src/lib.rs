//! # Host Bridge Traits
//!
//! Collaborator contracts the remote bridge composes.
//!
//! ## Overview
//!
//! This crate defines the contract between the bridge core and the concrete
//! network clients. The core never talks to reqwest or the AWS SDK directly;
//! it goes through these traits, which keeps the lifecycle and
//! error-normalization logic testable against mocks.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP request/response and streamed downloads
//! - [`ObjectStoreClient`](storage::ObjectStoreClient) - S3-style object reads
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic token-expiry tests
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to the host log
//!
//! ## Error Handling
//!
//! All traits use [`BridgeError`](error::BridgeError). Implementations should:
//!
//! - Convert client-specific errors to `BridgeError`
//! - Keep timeouts and connection failures distinguishable
//! - Fill in provider status and request id for storage failures
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`; one instance is shared by every call.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::{BridgeError, FaultClass, StorageFault};

// Re-export commonly used types
pub use http::{BodyStream, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{ObjectInfo, ObjectStoreClient};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
