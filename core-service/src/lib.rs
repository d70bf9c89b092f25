//! Remote resource bridge.
//!
//! Lets a synchronous host fetch remote resources over HTTP(S) and from S3
//! object storage. The crate is layered as:
//!
//! - [`locator`]: scheme routing of `s3://bucket/key` versus HTTP URLs
//! - [`BridgeService`]: the async operations over the shared HTTP client,
//!   object-store client and bearer token cache
//! - [`policy`]: which operations report failures as `ERROR ...` text and
//!   which return typed errors
//! - [`HostBridge`]: blocking entry points driven through a dedicated runtime
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use core_service::HostBridge;
//!
//! let bridge = HostBridge::from_config(BridgeConfig::builder().build()?)?;
//! let text = bridge.s3_get_string("s3://eodata/manifest.json");
//! ```

mod bootstrap;
pub mod error;
mod host;
mod http;
pub mod locator;
mod object_store;
pub mod policy;
mod service;

pub use error::{ErrorKind, OperationError, Result};
pub use host::HostBridge;
pub use locator::{InvalidLocator, ResourceLocator};
pub use policy::{FailurePolicy, HostOperation};
pub use service::{BearerAuth, BridgeService, TransferSettings};
