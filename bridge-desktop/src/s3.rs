//! S3 client implementation using the AWS SDK

use std::ops::Range;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::RequestId;
use bridge_traits::{
    error::{BridgeError, Result, StorageFault},
    storage::{ObjectInfo, ObjectStoreClient},
};
use bytes::Bytes;
use tracing::{debug, warn};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Connection settings for [`AwsS3Client`].
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            force_path_style: false,
        }
    }
}

/// Shared S3 client
///
/// Creating an S3 client is relatively expensive, so one instance is built
/// up front and reused for every call. Credentials come from the standard
/// AWS provider chain (environment, shared profile, instance metadata).
#[derive(Debug, Clone)]
pub struct AwsS3Client {
    client: aws_sdk_s3::Client,
}

impl AwsS3Client {
    /// Load the default AWS configuration for the given settings.
    pub async fn new(settings: &S3Settings) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        debug!(region = %settings.region, endpoint = ?settings.endpoint, "S3 client configured");

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }
}

/// Convert an SDK failure into a [`StorageFault`] carrying the provider's
/// status, error code and request id.
fn storage_fault<E>(err: SdkError<E, aws_sdk_s3::config::http::HttpResponse>) -> BridgeError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    let mut fault = StorageFault::new(message, status);
    if let Some(code) = err.code() {
        fault = fault.with_code(code);
    }
    if let Some(request_id) = err.request_id() {
        fault = fault.with_request_id(request_id);
    }

    warn!(
        status = ?fault.status,
        code = ?fault.code,
        request_id = ?fault.request_id,
        class = %fault.class,
        "S3 request failed"
    );
    BridgeError::Storage(fault)
}

async fn collect_body(body: aws_sdk_s3::primitives::ByteStream) -> Result<Bytes> {
    body.collect()
        .await
        .map(|data| data.into_bytes())
        .map_err(|e| BridgeError::Storage(StorageFault::new(format!("Body read failed: {}", e), None)))
}

#[async_trait]
impl ObjectStoreClient for AwsS3Client {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        let response = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_fault)?;

        Ok(ObjectInfo {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: response.content_length().unwrap_or(0).max(0) as u64,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_fault)?;

        let data = collect_body(response.body).await?;
        debug!(bucket, key, bytes = data.len(), "Fetched S3 object");
        Ok(data)
    }

    async fn get_object_range(
        &self,
        bucket: &str,
        key: &str,
        range: Range<u64>,
    ) -> Result<Bytes> {
        if range.is_empty() {
            return Ok(Bytes::new());
        }

        // HTTP ranges are inclusive on both ends.
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .range(format!("bytes={}-{}", range.start, range.end - 1))
            .send()
            .await
            .map_err(storage_fault)?;

        collect_body(response.body).await
    }
}
