//! Scheme routing for resource locators.
//!
//! Anything starting with the literal prefix `s3://` is an object-store
//! reference of the form `s3://<bucket>/<key...>`. Every other string is
//! treated as an HTTP(S) URL and only validated later by the HTTP client.

use crate::error::{ErrorKind, OperationError};
use std::fmt;
use thiserror::Error;

pub const S3_SCHEME: &str = "s3://";

/// Message returned to the host for a malformed object-store locator.
pub const INVALID_S3_LOCATOR: &str = "Invalid S3 URL format. Expected 's3://bucket-name/key'.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", INVALID_S3_LOCATOR)]
pub struct InvalidLocator {
    pub input: String,
}

impl From<InvalidLocator> for OperationError {
    fn from(err: InvalidLocator) -> Self {
        OperationError::new(ErrorKind::LocatorInvalid, err.to_string()).with_source(err)
    }
}

/// A parsed resource reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    Http(String),
    S3 { bucket: String, key: String },
}

impl ResourceLocator {
    /// Route a locator string by scheme.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLocator`] for an `s3://` string whose bucket or key
    /// is empty or blank. Non-`s3://` strings never fail here.
    pub fn parse(input: &str) -> Result<Self, InvalidLocator> {
        let Some(rest) = input.strip_prefix(S3_SCHEME) else {
            return Ok(ResourceLocator::Http(input.to_string()));
        };

        let invalid = || InvalidLocator {
            input: input.to_string(),
        };

        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
        if bucket.trim().is_empty() || key.trim().is_empty() {
            return Err(invalid());
        }

        Ok(ResourceLocator::S3 {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Parse a string that must be an object-store locator.
    ///
    /// HTTP-shaped input is rejected with the same [`InvalidLocator`].
    pub fn parse_s3(input: &str) -> Result<(String, String), InvalidLocator> {
        match Self::parse(input)? {
            ResourceLocator::S3 { bucket, key } => Ok((bucket, key)),
            ResourceLocator::Http(_) => Err(InvalidLocator {
                input: input.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocator::Http(url) => f.write_str(url),
            ResourceLocator::S3 { bucket, key } => write!(f, "{}{}/{}", S3_SCHEME, bucket, key),
        }
    }
}
