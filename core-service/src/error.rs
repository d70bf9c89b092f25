use bridge_traits::{BridgeError, FaultClass};
use core_async::RuntimeError;
use core_auth::AuthError;
use std::fmt;
use thiserror::Error;

/// Longest slice of an error response body carried into a message.
const MAX_BODY_IN_MESSAGE: usize = 512;

/// Failure taxonomy shared by every bridge operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An `s3://` locator without a bucket or key
    LocatorInvalid,
    /// DNS, connect, TLS, timeout, or a malformed request
    TransportFailure,
    /// The server answered with a non-2xx status
    HttpStatusFailure,
    /// The object store rejected the request
    StorageProviderFailure,
    /// A token-using call found no usable bearer token
    TokenMissingOrExpired,
    /// A response did not have the expected shape
    PayloadShapeFailure,
    /// Creating directories or writing the local file failed
    LocalIoFailure,
    /// Empty URL, path, or token argument
    InvalidArgument,
    /// Misuse of the blocking adapter, a panicked task, or a missing collaborator
    BridgeFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::LocatorInvalid => "LocatorInvalid",
            ErrorKind::TransportFailure => "TransportFailure",
            ErrorKind::HttpStatusFailure => "HttpStatusFailure",
            ErrorKind::StorageProviderFailure => "StorageProviderFailure",
            ErrorKind::TokenMissingOrExpired => "TokenMissingOrExpired",
            ErrorKind::PayloadShapeFailure => "PayloadShapeFailure",
            ErrorKind::LocalIoFailure => "LocalIoFailure",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::BridgeFailure => "BridgeFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed bridge operation.
///
/// Carries the [`ErrorKind`] so typed callers can branch on it; text-only
/// callers get [`to_sentinel`](OperationError::to_sentinel).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct OperationError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    fault_class: Option<FaultClass>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            fault_class: None,
            source: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP or provider status, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Not-found / access-denied / transient classification of a storage fault.
    pub fn fault_class(&self) -> Option<FaultClass> {
        self.fault_class
    }

    /// Render as in-band error text for the host.
    ///
    /// Always starts with `ERROR`. Invalid locators keep their historical
    /// `ERROR: <message>` form; every other kind is `ERROR (<Kind>): <message>`.
    pub fn to_sentinel(&self) -> String {
        match self.kind {
            ErrorKind::LocatorInvalid => format!("ERROR: {}", self.message),
            kind => format!("ERROR ({}): {}", kind, self.message),
        }
    }
}

impl From<BridgeError> for OperationError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::HttpStatus { status, ref body } => {
                let message = status_message(status, body);
                OperationError::new(ErrorKind::HttpStatusFailure, message)
                    .with_status(status)
                    .with_source(err)
            }
            BridgeError::Storage(fault) => {
                let mut op = OperationError::new(ErrorKind::StorageProviderFailure, fault.to_string());
                op.status = fault.status;
                op.fault_class = Some(fault.class);
                op.with_source(fault)
            }
            BridgeError::Io(io) => OperationError::new(ErrorKind::LocalIoFailure, io.to_string())
                .with_source(io),
            BridgeError::InvalidRequest(_)
            | BridgeError::Timeout(_)
            | BridgeError::Connect(_)
            | BridgeError::OperationFailed(_) => {
                OperationError::new(ErrorKind::TransportFailure, err.to_string()).with_source(err)
            }
        }
    }
}

impl From<AuthError> for OperationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Network(bridge) => OperationError::from(bridge),
            AuthError::TokenEndpoint { status, ref body } => {
                let message = format!("Token endpoint rejected the request. {}", status_message(status, body));
                OperationError::new(ErrorKind::HttpStatusFailure, message)
                    .with_status(status)
                    .with_source(err)
            }
            AuthError::MalformedResponse(_) => {
                OperationError::new(ErrorKind::PayloadShapeFailure, err.to_string()).with_source(err)
            }
            AuthError::InvalidToken(ref message) => {
                OperationError::invalid_argument(message.clone()).with_source(err)
            }
            AuthError::ValidityOutOfRange(_) => {
                OperationError::new(ErrorKind::BridgeFailure, err.to_string()).with_source(err)
            }
            AuthError::NotInitialized | AuthError::Expired { .. } => {
                OperationError::new(ErrorKind::TokenMissingOrExpired, err.to_string())
                    .with_source(err)
            }
        }
    }
}

impl From<RuntimeError> for OperationError {
    fn from(err: RuntimeError) -> Self {
        OperationError::new(ErrorKind::BridgeFailure, err.to_string()).with_source(err)
    }
}

impl From<std::io::Error> for OperationError {
    fn from(err: std::io::Error) -> Self {
        OperationError::new(ErrorKind::LocalIoFailure, err.to_string()).with_source(err)
    }
}

fn status_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("Response status code does not indicate success: {}.", status);
    }

    let mut end = body.len().min(MAX_BODY_IN_MESSAGE);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    let ellipsis = if end < body.len() { "..." } else { "" };
    format!(
        "Response status code does not indicate success: {}. Body: {}{}",
        status,
        &body[..end],
        ellipsis
    )
}

pub type Result<T> = std::result::Result<T, OperationError>;
