//! Shared mocks for the bridge integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{BodyStream, HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::{ObjectInfo, ObjectStoreClient};
use bridge_traits::time::ManualClock;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use core_runtime::config::BridgeConfig;
use core_service::{BridgeService, HostBridge};
use mockall::mock;
use std::ops::Range;
use std::sync::Arc;

mock! {
    pub HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn download_stream(&self, request: HttpRequest) -> BridgeResult<BodyStream>;
    }
}

mock! {
    pub ObjectStore {}

    #[async_trait]
    impl ObjectStoreClient for ObjectStore {
        async fn head_object(&self, bucket: &str, key: &str) -> BridgeResult<ObjectInfo>;
        async fn get_object(&self, bucket: &str, key: &str) -> BridgeResult<Bytes>;
        async fn get_object_range(
            &self,
            bucket: &str,
            key: &str,
            range: Range<u64>,
        ) -> BridgeResult<Bytes>;
    }
}

pub const TOKEN_URL: &str = "https://identity.example.com/auth/token";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

/// Multipart kicks in above 10 bytes, in parts of 4.
pub fn test_config(
    http: MockHttpClient,
    store: MockObjectStore,
    clock: Arc<ManualClock>,
) -> BridgeConfig {
    BridgeConfig::builder()
        .http_client(Arc::new(http))
        .object_store(Arc::new(store))
        .clock(clock)
        .multipart_threshold(10)
        .multipart_part_size(4)
        .multipart_concurrency(2)
        .build()
        .unwrap()
}

pub fn host_bridge(
    http: MockHttpClient,
    store: MockObjectStore,
    clock: Arc<ManualClock>,
) -> HostBridge {
    HostBridge::from_config(test_config(http, store, clock)).unwrap()
}

pub fn service(
    http: MockHttpClient,
    store: MockObjectStore,
    clock: Arc<ManualClock>,
) -> BridgeService {
    let config = BridgeConfig::builder()
        .multipart_threshold(10)
        .multipart_part_size(4)
        .multipart_concurrency(2)
        .build()
        .unwrap();
    BridgeService::new(Arc::new(http), Arc::new(store), clock, &config)
}

pub fn ok(body: &str) -> BridgeResult<HttpResponse> {
    Ok(HttpResponse::new(200, body.to_string()))
}

pub fn object_info(bucket: &str, key: &str, size: u64) -> ObjectInfo {
    ObjectInfo {
        bucket: bucket.to_string(),
        key: key.to_string(),
        size,
    }
}

pub fn stream_of(data: &'static [u8]) -> BodyStream {
    Box::new(std::io::Cursor::new(data))
}
