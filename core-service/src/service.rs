//! Async core of the bridge.
//!
//! [`BridgeService`] owns the shared collaborators (one HTTP client, one
//! object-store client, the token cache, the clock) and exposes every
//! operation as an `async fn` returning a typed [`Result`]. The blocking
//! host surface in [`crate::host`] drives these through the sync bridge.

use crate::error::{OperationError, Result};
use bridge_traits::{Clock, HttpClient, HttpRequest, ObjectStoreClient};
use bytes::Bytes;
use core_auth::{ClientCredentials, TokenCache, TokenGrant};
use core_runtime::config::BridgeConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which bearer token, if any, a request carries.
#[derive(Clone, PartialEq, Eq)]
pub enum BearerAuth {
    None,
    /// The token held by the cache; refused before any I/O when missing or
    /// expired
    Cached,
    /// A caller-supplied token used for this request only
    Explicit(String),
}

impl BearerAuth {
    pub fn cached_if(use_token: bool) -> Self {
        if use_token {
            BearerAuth::Cached
        } else {
            BearerAuth::None
        }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BearerAuth::None => f.write_str("None"),
            BearerAuth::Cached => f.write_str("Cached"),
            BearerAuth::Explicit(_) => f.write_str("Explicit([REDACTED])"),
        }
    }
}

/// Sizing of managed object downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    /// Objects strictly larger than this are fetched in ranged parts
    pub multipart_threshold: u64,
    pub part_size: u64,
    /// Parts in flight at once
    pub concurrency: usize,
}

impl From<&BridgeConfig> for TransferSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            multipart_threshold: config.multipart_threshold,
            part_size: config.multipart_part_size.max(1),
            concurrency: config.multipart_concurrency.max(1),
        }
    }
}

/// Shared bridge context.
pub struct BridgeService {
    pub(crate) http_client: Arc<dyn HttpClient>,
    pub(crate) object_store: Arc<dyn ObjectStoreClient>,
    pub(crate) tokens: TokenCache,
    pub(crate) transfer: TransferSettings,
}

impl BridgeService {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        object_store: Arc<dyn ObjectStoreClient>,
        clock: Arc<dyn Clock>,
        config: &BridgeConfig,
    ) -> Self {
        let tokens = TokenCache::new(
            Arc::clone(&http_client),
            clock,
            config.token_fallback_validity,
        );

        Self {
            http_client,
            object_store,
            tokens,
            transfer: TransferSettings::from(config),
        }
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Run a client-credentials exchange and store the token.
    ///
    /// On failure the previously stored token is untouched.
    #[instrument(skip(self, client_id, client_secret))]
    pub async fn acquire_token(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenGrant> {
        require_non_blank(token_url, "Token URL")?;

        let credentials = ClientCredentials::new(token_url, client_id, client_secret);
        let grant = self.tokens.acquire(&credentials).await?;

        info!(valid_for_secs = grant.valid_for_secs, "Token acquired");
        Ok(grant)
    }

    /// Store a caller-supplied token for the fallback validity window.
    pub fn set_token(&self, token: &str) -> Result<i64> {
        Ok(self.tokens.set_token(token)?)
    }

    /// Resolve the bearer token to attach, enforcing cache usability.
    pub(crate) fn resolve_bearer(&self, auth: &BearerAuth) -> Result<Option<String>> {
        match auth {
            BearerAuth::None => Ok(None),
            BearerAuth::Cached => Ok(Some(self.tokens.usable_token()?)),
            BearerAuth::Explicit(token) if token.trim().is_empty() => {
                Err(OperationError::invalid_argument("Token cannot be empty."))
            }
            BearerAuth::Explicit(token) => Ok(Some(token.clone())),
        }
    }
}

pub(crate) fn with_bearer(request: HttpRequest, bearer: Option<String>) -> HttpRequest {
    match bearer {
        Some(token) => request.bearer_token(token),
        None => request,
    }
}

pub(crate) fn require_non_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OperationError::invalid_argument(format!(
            "{} cannot be empty.",
            what
        )));
    }
    Ok(())
}

pub(crate) fn require_path(path: &Path) -> Result<()> {
    require_non_blank(&path.to_string_lossy(), "Local file path")
}

/// Decode a body as UTF-8 text, dropping a leading byte-order mark and
/// replacing invalid sequences.
pub(crate) fn decode_text(body: &Bytes) -> String {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&body[..]);
    String::from_utf8_lossy(body).into_owned()
}

/// Create the parent directories of `path` if they are missing.
pub(crate) async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Best-effort removal of a partially written file.
pub(crate) async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(error = %e, "Could not remove partial download");
    }
}
