//! Workspace umbrella crate.
//!
//! Host embedders depend on `remote-bridge` and get the blocking host surface
//! ([`HostBridge`]) plus the configuration and logging entry points without
//! wiring each workspace crate individually. The `desktop-shims` feature (on
//! by default) pulls in the reqwest and AWS SDK collaborators.

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{
    config::{BridgeConfig, BridgeConfigBuilder},
    logging::{init_logging, LogFormat, LoggingConfig},
};
#[cfg(feature = "desktop-shims")]
pub use core_service::{
    BridgeService, ErrorKind, HostBridge, OperationError, ResourceLocator,
};
