use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error(transparent)]
    Storage(#[from] StorageFault),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Coarse classification of an object-store failure, derived from the
/// provider-reported HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    NotFound,
    AccessDenied,
    /// No response, throttling, or a 5xx; a later attempt may succeed.
    Transient,
    Other,
}

impl FaultClass {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None | Some(408) | Some(429) => FaultClass::Transient,
            Some(404) => FaultClass::NotFound,
            Some(401) | Some(403) => FaultClass::AccessDenied,
            Some(s) if s >= 500 => FaultClass::Transient,
            Some(_) => FaultClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FaultClass::NotFound => "NotFound",
            FaultClass::AccessDenied => "AccessDenied",
            FaultClass::Transient => "Transient",
            FaultClass::Other => "Other",
        }
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by an object-store provider.
///
/// Carries the provider's status and request identifier so the rendered
/// message is enough to chase the request in provider-side logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct StorageFault {
    pub class: FaultClass,
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
    pub request_id: Option<String>,
}

impl StorageFault {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            class: FaultClass::from_status(status),
            message: message.into(),
            code: None,
            status,
            request_id: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl fmt::Display for StorageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{}: ", code)?;
        }
        write!(
            f,
            "{} (Request ID: {}, HTTP Status: {})",
            self.message,
            self.request_id.as_deref().unwrap_or("unknown"),
            self.status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string()),
        )
    }
}
