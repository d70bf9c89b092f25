//! # Authentication Module
//!
//! Bearer token handling for the remote bridge.
//!
//! ## Overview
//!
//! Obtains access tokens with the OAuth 2.0 client-credentials grant and
//! keeps the most recent one in a [`TokenCache`] with its absolute expiry.
//!
//! ## Features
//!
//! - Form-encoded client-credentials exchange, sent exactly once
//! - Fallback validity window when the provider omits `expires_in`
//! - Pre-flight usability checks distinguishing "never set" from "expired"
//! - Token values redacted from `Debug` output and logs

pub mod client_credentials;
pub mod error;
pub mod token_cache;
pub mod types;

pub use error::{AuthError, Result};
pub use token_cache::TokenCache;
pub use types::{ClientCredentials, TokenGrant, TokenState};
