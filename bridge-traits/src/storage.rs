//! Object Storage Abstraction
//!
//! The subset of an S3-style object store the bridge needs: metadata, whole
//! object reads, and ranged reads for part-wise downloads.

use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Range;

use crate::error::Result;

/// Object metadata returned by a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub bucket: String,
    pub key: String,
    pub size: u64,
}

/// Async object-store client.
///
/// Implementations wrap one long-lived provider client and report provider
/// failures as [`BridgeError::Storage`](crate::error::BridgeError::Storage)
/// with status and request id filled in whenever the provider supplied them.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::ObjectStoreClient;
///
/// async fn size_of(store: &dyn ObjectStoreClient) -> Result<u64> {
///     Ok(store.head_object("bucket", "path/to/key").await?.size)
/// }
/// ```
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Fetch object metadata without the body.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo>;

    /// Fetch the full object body.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Fetch the half-open byte range `range` of the object.
    async fn get_object_range(&self, bucket: &str, key: &str, range: Range<u64>)
        -> Result<Bytes>;
}
