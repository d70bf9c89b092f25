//! OAuth 2.0 client-credentials exchange
//!
//! Implements the `client_credentials` grant of RFC 6749 §4.4: the client id
//! and secret are posted form-encoded to the token endpoint and the JSON
//! response is parsed into a [`TokenGrant`].
//!
//! # Security
//!
//! Neither the client secret nor the returned access token is ever logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::client_credentials::request_token;
//! use core_auth::ClientCredentials;
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let credentials = ClientCredentials::new(
//!     "https://identity.example.com/token",
//!     "my-client",
//!     "my-secret",
//! );
//! let grant = request_token(http_client.as_ref(), &credentials, 1800).await?;
//! println!("Token valid for {}s", grant.valid_for_secs);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{validity_window, ClientCredentials, TokenGrant};
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Form fields of a client-credentials grant request.
#[derive(Serialize)]
struct GrantRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Token response from the identity provider.
///
/// `access_token` is mandatory but declared optional so that a missing
/// field is reported as a malformed response rather than a JSON error.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Exchange client credentials for an access token.
///
/// The request is sent once. `fallback_validity_secs` applies when the
/// response omits `expires_in`.
///
/// # Errors
///
/// - [`AuthError::Network`] when the endpoint cannot be reached
/// - [`AuthError::TokenEndpoint`] for a non-2xx response
/// - [`AuthError::MalformedResponse`] when the body is not JSON, carries
///   no non-empty `access_token`, or has a negative or unrepresentable
///   `expires_in`
#[instrument(skip(http_client, credentials), fields(token_url = %credentials.token_url))]
pub async fn request_token(
    http_client: &dyn HttpClient,
    credentials: &ClientCredentials,
    fallback_validity_secs: i64,
) -> Result<TokenGrant> {
    let request = HttpRequest::post(credentials.token_url.clone()).form(&GrantRequest {
        grant_type: "client_credentials",
        client_id: &credentials.client_id,
        client_secret: &credentials.client_secret,
    })?;

    debug!("Requesting client-credentials token");

    let response = http_client.execute(request).await?;

    if !response.is_success() {
        let status = response.status;
        let body = response.text_lossy();
        warn!(status, "Token endpoint rejected the request");
        return Err(AuthError::TokenEndpoint { status, body });
    }

    let parsed: TokenResponse = serde_json::from_slice(&response.body)
        .map_err(|e| AuthError::MalformedResponse(format!("Token response is not JSON: {}", e)))?;

    let access_token = match parsed.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            warn!("Token response carried no access_token");
            return Err(AuthError::MalformedResponse(
                "Token response is missing access_token".to_string(),
            ));
        }
    };

    let valid_for_secs = match parsed.expires_in {
        Some(secs) if validity_window(secs).is_none() => {
            warn!(expires_in = secs, "Token response carried an unusable expires_in");
            return Err(AuthError::MalformedResponse(format!(
                "expires_in of {} seconds is out of range",
                secs
            )));
        }
        Some(secs) => secs,
        None => {
            debug!(
                fallback_secs = fallback_validity_secs,
                "Token response has no expires_in, applying fallback window"
            );
            fallback_validity_secs
        }
    };

    Ok(TokenGrant {
        access_token,
        valid_for_secs,
        token_type: parsed.token_type,
        scope: parsed.scope,
    })
}
