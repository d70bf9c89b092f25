//! Bearer token cache
//!
//! Holds at most one bearer token with its absolute expiry. Acquisition is
//! explicit: nothing here refreshes in the background. Token-consuming
//! callers check usability with [`TokenCache::usable_token`] before any
//! network traffic.
//!
//! # Concurrency
//!
//! The token/expiry pair lives under a single lock and is always replaced
//! whole. Acquisitions are serialized by a separate async lock, so when two
//! callers acquire concurrently the one that completes last wins.

use crate::client_credentials::request_token;
use crate::error::{AuthError, Result};
use crate::types::{ClientCredentials, TokenGrant, TokenState};
use bridge_traits::http::HttpClient;
use bridge_traits::time::Clock;
use core_async::sync::Mutex;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Process-wide bearer token cache.
pub struct TokenCache {
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    fallback_validity_secs: i64,
    state: RwLock<Option<TokenState>>,
    acquire_lock: Mutex<()>,
}

impl TokenCache {
    /// Create an empty cache.
    ///
    /// `fallback_validity` is applied when a token response omits
    /// `expires_in` and to tokens stored with [`set_token`](Self::set_token).
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
        fallback_validity: Duration,
    ) -> Self {
        Self {
            http_client,
            clock,
            fallback_validity_secs: i64::try_from(fallback_validity.as_secs()).unwrap_or(i64::MAX),
            state: RwLock::new(None),
            acquire_lock: Mutex::new(()),
        }
    }

    /// Run a client-credentials exchange and store the returned token.
    ///
    /// On any failure the cache is left exactly as it was.
    #[instrument(skip(self, credentials), fields(token_url = %credentials.token_url))]
    pub async fn acquire(&self, credentials: &ClientCredentials) -> Result<TokenGrant> {
        let _guard = self.acquire_lock.lock().await;

        let grant = request_token(
            self.http_client.as_ref(),
            credentials,
            self.fallback_validity_secs,
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Token acquisition failed, keeping previous token");
            e
        })?;

        let state = TokenState::new(
            grant.access_token.clone(),
            self.clock.now(),
            grant.valid_for_secs,
        )
        .map_err(|e| {
            warn!(error = %e, "Token expiry not representable, keeping previous token");
            AuthError::MalformedResponse(e.to_string())
        })?;
        let expires_at = state.expires_at;
        *self.state.write() = Some(state);

        info!(
            valid_for_secs = grant.valid_for_secs,
            expires_at = %expires_at,
            "Bearer token stored"
        );
        Ok(grant)
    }

    /// Store a caller-supplied token for the fallback validity window.
    ///
    /// Returns the number of seconds the token is considered valid.
    pub fn set_token(&self, token: &str) -> Result<i64> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken("Token cannot be empty.".to_string()));
        }

        let state = TokenState::new(token, self.clock.now(), self.fallback_validity_secs)?;
        *self.state.write() = Some(state);

        debug!(valid_for_secs = self.fallback_validity_secs, "Bearer token set by caller");
        Ok(self.fallback_validity_secs)
    }

    /// Snapshot of the stored token, if any.
    pub fn current(&self) -> Option<TokenState> {
        self.state.read().clone()
    }

    /// Return the stored token if it can be used right now.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotInitialized`] when no token was ever stored
    /// - [`AuthError::Expired`] when the stored token is past its expiry
    pub fn usable_token(&self) -> Result<String> {
        let now = self.clock.now();
        match self.state.read().as_ref() {
            None => Err(AuthError::NotInitialized),
            Some(state) if state.is_usable(now) => Ok(state.token.clone()),
            Some(state) => {
                debug!(expired_at = %state.expires_at, "Stored bearer token has expired");
                Err(AuthError::Expired {
                    expired_at: state.expires_at,
                })
            }
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("state", &*self.state.read())
            .field("fallback_validity_secs", &self.fallback_validity_secs)
            .finish()
    }
}
