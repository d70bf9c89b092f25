//! # Bridge Configuration
//!
//! Builder-based configuration for the remote bridge.
//!
//! ## Overview
//!
//! [`BridgeConfig`] carries the network timeouts, object-store connection
//! settings, token fallback window, and the sizing of the sync bridge
//! runtime. It is constructed with [`BridgeConfig::builder`] and validated
//! on `build()`, failing fast with an actionable [`Error::Config`].
//!
//! Collaborators (HTTP client, object-store client, clock) may be injected
//! through the builder. When they are absent the service layer
//! supplies desktop defaults.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::BridgeConfig;
//! use std::time::Duration;
//!
//! let config = BridgeConfig::builder()
//!     .request_timeout(Duration::from_secs(30))
//!     .s3_region("us-west-2")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.s3_region, "us-west-2");
//! ```
//!
//! ## Environment overrides
//!
//! [`BridgeConfigBuilder::with_env_overrides`] reads `REMOTE_BRIDGE_*`
//! variables on top of whatever the builder already holds:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `REMOTE_BRIDGE_REQUEST_TIMEOUT_SECS` | `request_timeout` |
//! | `REMOTE_BRIDGE_CONNECT_TIMEOUT_SECS` | `connect_timeout` |
//! | `REMOTE_BRIDGE_USER_AGENT` | `user_agent` |
//! | `REMOTE_BRIDGE_S3_REGION` | `s3_region` |
//! | `REMOTE_BRIDGE_S3_ENDPOINT` | `s3_endpoint` |
//! | `REMOTE_BRIDGE_S3_FORCE_PATH_STYLE` | `s3_force_path_style` |
//! | `REMOTE_BRIDGE_TOKEN_FALLBACK_SECS` | `token_fallback_validity` |
//! | `REMOTE_BRIDGE_WORKER_THREADS` | `worker_threads` |
//! | `REMOTE_BRIDGE_MULTIPART_THRESHOLD` | `multipart_threshold` (bytes) |
//! | `REMOTE_BRIDGE_MULTIPART_PART_SIZE` | `multipart_part_size` (bytes) |
//! | `REMOTE_BRIDGE_MULTIPART_CONCURRENCY` | `multipart_concurrency` |

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, ObjectStoreClient};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(100);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("remote-bridge/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_S3_REGION: &str = "eu-central-1";
pub const DEFAULT_TOKEN_FALLBACK_VALIDITY: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const DEFAULT_MULTIPART_THRESHOLD: u64 = 16 * 1024 * 1024;
pub const DEFAULT_MULTIPART_PART_SIZE: u64 = 8 * 1024 * 1024;
pub const DEFAULT_MULTIPART_CONCURRENCY: usize = 4;

const ENV_PREFIX: &str = "REMOTE_BRIDGE_";
const MAX_WORKER_THREADS: usize = 64;
const MAX_MULTIPART_CONCURRENCY: usize = 64;
const MAX_TOKEN_FALLBACK_VALIDITY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Remote bridge configuration.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Whole-request timeout for HTTP calls
    pub request_timeout: Duration,

    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,

    pub user_agent: String,

    /// Region for the object-store client
    pub s3_region: String,

    /// Custom endpoint for S3-compatible stores
    pub s3_endpoint: Option<String>,

    pub s3_force_path_style: bool,

    /// Validity applied when a token response omits `expires_in`, and to
    /// tokens set directly by the host
    pub token_fallback_validity: Duration,

    /// Worker threads of the sync bridge runtime
    pub worker_threads: usize,

    /// Objects larger than this are downloaded in ranged parts
    pub multipart_threshold: u64,

    pub multipart_part_size: u64,

    /// Maximum ranged parts in flight
    pub multipart_concurrency: usize,

    /// HTTP client (desktop default: reqwest)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Object-store client (desktop default: AWS SDK)
    pub object_store: Option<Arc<dyn ObjectStoreClient>>,

    /// Time source (default: system clock)
    pub clock: Option<Arc<dyn Clock>>,
}

impl std::fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("s3_region", &self.s3_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("s3_force_path_style", &self.s3_force_path_style)
            .field("token_fallback_validity", &self.token_fallback_validity)
            .field("worker_threads", &self.worker_threads)
            .field("multipart_threshold", &self.multipart_threshold)
            .field("multipart_part_size", &self.multipart_part_size)
            .field("multipart_concurrency", &self.multipart_concurrency)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field(
                "object_store",
                &self
                    .object_store
                    .as_ref()
                    .map(|_| "ObjectStoreClient { ... }"),
            )
            .field("clock", &self.clock.as_ref().map(|_| "Clock { ... }"))
            .finish()
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            s3_region: DEFAULT_S3_REGION.to_string(),
            s3_endpoint: None,
            s3_force_path_style: false,
            token_fallback_validity: DEFAULT_TOKEN_FALLBACK_VALIDITY,
            worker_threads: DEFAULT_WORKER_THREADS,
            multipart_threshold: DEFAULT_MULTIPART_THRESHOLD,
            multipart_part_size: DEFAULT_MULTIPART_PART_SIZE,
            multipart_concurrency: DEFAULT_MULTIPART_CONCURRENCY,
            http_client: None,
            object_store: None,
            clock: None,
        }
    }
}

impl BridgeConfig {
    /// Creates a new builder for constructing a `BridgeConfig`.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Timeouts are non-zero and the connect timeout fits in the request timeout
    /// - User agent and region are not empty
    /// - A custom endpoint is an absolute http(s) URL
    /// - Runtime and multipart sizing are within bounds
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::Config(
                "Connect timeout must be greater than zero".to_string(),
            ));
        }

        if self.connect_timeout > self.request_timeout {
            return Err(Error::Config(format!(
                "Connect timeout ({:?}) cannot exceed the request timeout ({:?})",
                self.connect_timeout, self.request_timeout
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if self.s3_region.trim().is_empty() {
            return Err(Error::Config(
                "S3 region cannot be empty. Use .s3_region() to set it.".to_string(),
            ));
        }

        if let Some(endpoint) = &self.s3_endpoint {
            let parsed = Url::parse(endpoint).map_err(|e| {
                Error::Config(format!("Invalid S3 endpoint '{}': {}", endpoint, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "S3 endpoint must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }

        if self.token_fallback_validity.as_secs() == 0 {
            return Err(Error::Config(
                "Token fallback validity must be at least one second".to_string(),
            ));
        }

        if self.token_fallback_validity > MAX_TOKEN_FALLBACK_VALIDITY {
            return Err(Error::Config(format!(
                "Token fallback validity must not exceed {} seconds, got {}",
                MAX_TOKEN_FALLBACK_VALIDITY.as_secs(),
                self.token_fallback_validity.as_secs()
            )));
        }

        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(Error::Config(format!(
                "Worker threads must be between 1 and {}, got {}",
                MAX_WORKER_THREADS, self.worker_threads
            )));
        }

        if self.multipart_part_size == 0 {
            return Err(Error::Config(
                "Multipart part size must be greater than zero".to_string(),
            ));
        }

        if self.multipart_threshold < self.multipart_part_size {
            return Err(Error::Config(format!(
                "Multipart threshold ({} bytes) must be at least the part size ({} bytes)",
                self.multipart_threshold, self.multipart_part_size
            )));
        }

        if self.multipart_concurrency == 0
            || self.multipart_concurrency > MAX_MULTIPART_CONCURRENCY
        {
            return Err(Error::Config(format!(
                "Multipart concurrency must be between 1 and {}, got {}",
                MAX_MULTIPART_CONCURRENCY, self.multipart_concurrency
            )));
        }

        Ok(())
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets the object-store region.
    ///
    /// Default: `eu-central-1`
    pub fn s3_region(mut self, region: impl Into<String>) -> Self {
        self.config.s3_region = region.into();
        self
    }

    /// Points the object-store client at an S3-compatible endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::BridgeConfig;
    ///
    /// let config = BridgeConfig::builder()
    ///     .s3_endpoint("http://localhost:9000")
    ///     .s3_force_path_style(true)
    ///     .build()
    ///     .unwrap();
    /// assert!(config.s3_force_path_style);
    /// ```
    pub fn s3_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.s3_endpoint = Some(endpoint.into());
        self
    }

    pub fn s3_force_path_style(mut self, enabled: bool) -> Self {
        self.config.s3_force_path_style = enabled;
        self
    }

    /// Sets the validity window used when the token endpoint omits
    /// `expires_in`.
    ///
    /// Default: 30 minutes
    pub fn token_fallback_validity(mut self, validity: Duration) -> Self {
        self.config.token_fallback_validity = validity;
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads;
        self
    }

    pub fn multipart_threshold(mut self, bytes: u64) -> Self {
        self.config.multipart_threshold = bytes;
        self
    }

    pub fn multipart_part_size(mut self, bytes: u64) -> Self {
        self.config.multipart_part_size = bytes;
        self
    }

    pub fn multipart_concurrency(mut self, parts: usize) -> Self {
        self.config.multipart_concurrency = parts;
        self
    }

    /// Injects a custom HTTP client.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use core_runtime::config::BridgeConfig;
    /// use std::sync::Arc;
    ///
    /// let config = BridgeConfig::builder()
    ///     .http_client(Arc::new(MyHttpClient))
    ///     .build()?;
    /// ```
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.config.http_client = Some(client);
        self
    }

    pub fn object_store(mut self, client: Arc<dyn ObjectStoreClient>) -> Self {
        self.config.object_store = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config.clock = Some(clock);
        self
    }

    /// Applies `REMOTE_BRIDGE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the variable when a value cannot be
    /// parsed.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary lookup keyed by the full
    /// `REMOTE_BRIDGE_*` variable name.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name).map(|value| (name, value))
        };

        if let Some((name, value)) = get("REQUEST_TIMEOUT_SECS") {
            self.config.request_timeout = Duration::from_secs(parse_var(&name, &value)?);
        }
        if let Some((name, value)) = get("CONNECT_TIMEOUT_SECS") {
            self.config.connect_timeout = Duration::from_secs(parse_var(&name, &value)?);
        }
        if let Some((_, value)) = get("USER_AGENT") {
            self.config.user_agent = value;
        }
        if let Some((_, value)) = get("S3_REGION") {
            self.config.s3_region = value;
        }
        if let Some((_, value)) = get("S3_ENDPOINT") {
            self.config.s3_endpoint = if value.trim().is_empty() {
                None
            } else {
                Some(value)
            };
        }
        if let Some((name, value)) = get("S3_FORCE_PATH_STYLE") {
            self.config.s3_force_path_style = parse_bool(&name, &value)?;
        }
        if let Some((name, value)) = get("TOKEN_FALLBACK_SECS") {
            self.config.token_fallback_validity = Duration::from_secs(parse_var(&name, &value)?);
        }
        if let Some((name, value)) = get("WORKER_THREADS") {
            self.config.worker_threads = parse_var(&name, &value)?;
        }
        if let Some((name, value)) = get("MULTIPART_THRESHOLD") {
            self.config.multipart_threshold = parse_var(&name, &value)?;
        }
        if let Some((name, value)) = get("MULTIPART_PART_SIZE") {
            self.config.multipart_part_size = parse_var(&name, &value)?;
        }
        if let Some((name, value)) = get("MULTIPART_CONCURRENCY") {
            self.config.multipart_concurrency = parse_var(&name, &value)?;
        }

        Ok(self)
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid setting.
    pub fn build(self) -> Result<BridgeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value '{}' for {}: {}", value, name, e)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid value '{}' for {}: expected true or false",
            value, name
        ))),
    }
}
