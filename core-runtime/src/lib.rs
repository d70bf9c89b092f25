//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the remote bridge:
//! - Logging and tracing setup, with optional mirroring into the host log
//! - Validated bridge configuration with environment overrides

pub mod config;
pub mod error;
pub mod logging;

pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use error::{Error, Result};
