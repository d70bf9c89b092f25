//! Token types

use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// A bearer token together with its absolute expiry.
///
/// Token and expiry are always replaced together.
///
/// # Security
///
/// The `Debug` implementation redacts the token value.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Create a token valid for `valid_for_secs` seconds after `now`.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidityOutOfRange`] for a negative window or an expiry
    /// past the representable range of timestamps.
    pub fn new(token: impl Into<String>, now: DateTime<Utc>, valid_for_secs: i64) -> Result<Self> {
        let expires_at = validity_window(valid_for_secs)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or(AuthError::ValidityOutOfRange(valid_for_secs))?;

        Ok(Self {
            token: token.into(),
            expires_at,
        })
    }

    /// A token is usable while it is non-empty and `now` is strictly before
    /// the expiry.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }
}

/// A non-negative validity window in seconds as a duration, if representable.
pub(crate) fn validity_window(valid_for_secs: i64) -> Option<Duration> {
    if valid_for_secs < 0 {
        return None;
    }
    Duration::try_seconds(valid_for_secs)
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client-credentials grant parameters.
#[derive(Clone)]
pub struct ClientCredentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful token exchange.
#[derive(Clone)]
pub struct TokenGrant {
    pub access_token: String,
    /// Validity window actually applied, in seconds.
    pub valid_for_secs: i64,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("valid_for_secs", &self.valid_for_secs)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}
