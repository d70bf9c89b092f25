//! Per-operation failure policy.
//!
//! Text- and status-returning host operations embed failures in-band as
//! `ERROR ...` text, because the host surface has no structured error
//! handling. Binary operations return a real error instead, since sentinel
//! bytes would be indistinguishable from payload.

use crate::error::Result;
use tracing::warn;

/// How an operation reports failure to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Render the failure as text starting with `ERROR`
    Sentinel,
    /// Return the typed error
    Propagate,
}

/// Operations of the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOperation {
    HttpGet,
    HttpPost,
    HttpGetToken,
    HttpInitToken,
    SetToken,
    HttpGetWithToken,
    HttpGetString,
    HttpGetBinary,
    HttpDownload,
    S3GetString,
    S3Download,
}

impl HostOperation {
    pub const ALL: [HostOperation; 11] = [
        HostOperation::HttpGet,
        HostOperation::HttpPost,
        HostOperation::HttpGetToken,
        HostOperation::HttpInitToken,
        HostOperation::SetToken,
        HostOperation::HttpGetWithToken,
        HostOperation::HttpGetString,
        HostOperation::HttpGetBinary,
        HostOperation::HttpDownload,
        HostOperation::S3GetString,
        HostOperation::S3Download,
    ];

    /// Name the host calls the operation by.
    pub fn name(&self) -> &'static str {
        match self {
            HostOperation::HttpGet => "httpGet",
            HostOperation::HttpPost => "httpPost",
            HostOperation::HttpGetToken => "httpGetToken",
            HostOperation::HttpInitToken => "httpInitToken",
            HostOperation::SetToken => "setToken",
            HostOperation::HttpGetWithToken => "httpGetWithToken",
            HostOperation::HttpGetString => "httpGetString",
            HostOperation::HttpGetBinary => "httpGetBinary",
            HostOperation::HttpDownload => "httpDownload",
            HostOperation::S3GetString => "s3GetString",
            HostOperation::S3Download => "s3Download",
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        match self {
            HostOperation::HttpGetBinary => FailurePolicy::Propagate,
            _ => FailurePolicy::Sentinel,
        }
    }
}

/// Collapse a text result into host text under the sentinel policy.
pub fn render_text(operation: HostOperation, result: Result<String>) -> String {
    debug_assert_eq!(operation.policy(), FailurePolicy::Sentinel);

    match result {
        Ok(text) => text,
        Err(err) => {
            warn!(
                operation = operation.name(),
                kind = %err.kind(),
                error = %err,
                "Host operation failed"
            );
            err.to_sentinel()
        }
    }
}

/// Pass a result through under the propagate policy, logging failures.
pub fn propagate<T>(operation: HostOperation, result: Result<T>) -> Result<T> {
    debug_assert_eq!(operation.policy(), FailurePolicy::Propagate);

    if let Err(err) = &result {
        warn!(
            operation = operation.name(),
            kind = %err.kind(),
            error = %err,
            "Host operation failed"
        );
    }
    result
}
