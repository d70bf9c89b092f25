//! Bootstrap of a [`HostBridge`] from configuration.
//!
//! Collaborators injected through the config are used as-is. Missing ones
//! are filled with the desktop defaults when the `desktop-shims` feature is
//! enabled, and reported as a missing capability otherwise.

use crate::error::{ErrorKind, OperationError, Result};
use crate::host::HostBridge;
use crate::service::BridgeService;
use bridge_traits::{Clock, HttpClient, ObjectStoreClient, SystemClock};
use core_async::BlockingRuntime;
use core_runtime::config::BridgeConfig;
use std::sync::Arc;
use tracing::info;

impl HostBridge {
    /// Build the bridge context described by `config`.
    ///
    /// The object-store client is constructed on the bridge runtime, so this
    /// must be called from plain synchronous code.
    ///
    /// # Errors
    ///
    /// - `BridgeFailure` when the runtime cannot start or a required
    ///   collaborator is neither injected nor available as a default
    /// - `TransportFailure` when the default HTTP client cannot be built
    pub fn from_config(config: BridgeConfig) -> Result<Self> {
        let runtime = BlockingRuntime::new(config.worker_threads)?;

        let http_client = match config.http_client.clone() {
            Some(client) => client,
            None => default_http_client(&config)?,
        };

        let object_store = match config.object_store.clone() {
            Some(store) => store,
            None => default_object_store(&config, &runtime)?,
        };

        let clock: Arc<dyn Clock> = config
            .clock
            .clone()
            .unwrap_or_else(|| Arc::new(SystemClock));

        let service = BridgeService::new(http_client, object_store, clock, &config);

        info!(
            worker_threads = runtime.worker_threads(),
            s3_region = %config.s3_region,
            "Remote bridge initialized"
        );

        Ok(HostBridge::with_runtime(Arc::new(service), runtime))
    }
}

#[cfg(feature = "desktop-shims")]
fn default_http_client(config: &BridgeConfig) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeouts(
        config.request_timeout,
        config.connect_timeout,
        &config.user_agent,
    )?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_http_client(_config: &BridgeConfig) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing(
        "HttpClient",
        "Enable the 'desktop-shims' feature for the reqwest client or inject one with \
         BridgeConfig::builder().http_client(..).",
    ))
}

#[cfg(feature = "desktop-shims")]
fn default_object_store(
    config: &BridgeConfig,
    runtime: &BlockingRuntime,
) -> Result<Arc<dyn ObjectStoreClient>> {
    use bridge_desktop::{AwsS3Client, S3Settings};

    let settings = S3Settings {
        region: config.s3_region.clone(),
        endpoint: config.s3_endpoint.clone(),
        force_path_style: config.s3_force_path_style,
    };
    let client = runtime.run(async move { AwsS3Client::new(&settings).await })?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_object_store(
    _config: &BridgeConfig,
    _runtime: &BlockingRuntime,
) -> Result<Arc<dyn ObjectStoreClient>> {
    Err(capability_missing(
        "ObjectStoreClient",
        "Enable the 'desktop-shims' feature for the AWS SDK client or inject one with \
         BridgeConfig::builder().object_store(..).",
    ))
}

#[cfg_attr(feature = "desktop-shims", allow(dead_code))]
fn capability_missing(capability: &str, hint: &str) -> OperationError {
    OperationError::new(
        ErrorKind::BridgeFailure,
        format!("Capability missing: {}. {}", capability, hint),
    )
}
