use bridge_traits::BridgeError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    Network(#[from] BridgeError),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token validity of {0} seconds is out of range")]
    ValidityOutOfRange(i64),

    #[error("No token initialized. Call httpInitToken first.")]
    NotInitialized,

    #[error("Token expired, call httpInitToken again.")]
    Expired { expired_at: DateTime<Utc> },
}

pub type Result<T> = std::result::Result<T, AuthError>;
