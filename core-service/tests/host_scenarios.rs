//! End-to-end scenarios through the blocking host surface.
//!
//! These are plain `#[test]`s: the host bridge owns its own runtime and
//! must be called from synchronous code.

mod common;

use bridge_traits::error::BridgeError;
use bridge_traits::http::HttpResponse;
use bridge_traits::time::ManualClock;
use bridge_traits::StorageFault;
use bytes::Bytes;
use common::*;
use core_service::ErrorKind;
use std::sync::Arc;

const DATA_URL: &str = "https://catalogue.example.com/odata/v1/Products";

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(t0()))
}

fn bridge_with_http(http: MockHttpClient) -> core_service::HostBridge {
    host_bridge(http, MockObjectStore::new(), clock())
}

fn bridge_with_store(store: MockObjectStore) -> core_service::HostBridge {
    host_bridge(MockHttpClient::new(), store, clock())
}

#[test]
fn test_http_get_returns_body_text() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == DATA_URL && req.header_value("authorization").is_none())
        .times(1)
        .returning(|_| ok("hello"));

    assert_eq!(bridge_with_http(http).http_get(DATA_URL), "hello");
}

#[test]
fn test_http_get_non_success_status_is_error_text() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(HttpResponse::new(404, "Not Found")));

    let text = bridge_with_http(http).http_get(DATA_URL);
    assert!(text.starts_with("ERROR"), "{}", text);
    assert!(text.contains("HttpStatusFailure"));
    assert!(text.contains("404"));
}

#[test]
fn test_http_get_transport_failure_is_error_text() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Err(BridgeError::Connect("connection refused".to_string())));

    let text = bridge_with_http(http).http_get(DATA_URL);
    assert!(text.starts_with("ERROR (TransportFailure):"), "{}", text);
}

#[test]
fn test_http_get_empty_url_is_rejected_before_io() {
    let mut http = MockHttpClient::new();
    http.expect_execute().never();

    assert_eq!(
        bridge_with_http(http).http_get("   "),
        "ERROR (InvalidArgument): URL cannot be empty."
    );
}

#[test]
fn test_invalid_s3_locator_makes_no_network_call() {
    let mut store = MockObjectStore::new();
    store.expect_get_object().never();
    store.expect_head_object().never();
    let bridge = bridge_with_store(store);

    let expected = "ERROR: Invalid S3 URL format. Expected 's3://bucket-name/key'.";
    assert_eq!(bridge.s3_get_string("not-a-url"), expected);
    assert_eq!(bridge.s3_get_string("s3://bucket-only"), expected);
    assert_eq!(bridge.s3_download("s3:///key", "/tmp/out.bin"), expected);
}

#[test]
fn test_init_token_then_bearer_header_then_expiry() {
    let clock = clock();
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == TOKEN_URL)
        .times(1)
        .returning(|_| ok(r#"{"access_token":"abc","expires_in":60}"#));
    http.expect_execute()
        .withf(|req| req.url == DATA_URL && req.header_value("Authorization") == Some("Bearer abc"))
        .times(1)
        .returning(|_| ok("protected"));

    let bridge = host_bridge(http, MockObjectStore::new(), clock.clone());

    let message = bridge.http_init_token(TOKEN_URL, "client", "secret");
    assert_eq!(message, "Token saved and good for 60 seconds.");
    assert!(message.contains("60"));

    assert_eq!(bridge.http_get_string(DATA_URL, true), "protected");

    clock.advance(chrono::Duration::seconds(60));
    assert_eq!(
        bridge.http_get_string(DATA_URL, true),
        "ERROR (TokenMissingOrExpired): Token expired, call httpInitToken again."
    );
}

#[test]
fn test_token_use_without_init_is_refused() {
    let mut http = MockHttpClient::new();
    http.expect_execute().never();
    http.expect_download_stream().never();
    let bridge = bridge_with_http(http);

    let expected = "ERROR (TokenMissingOrExpired): No token initialized. Call httpInitToken first.";
    assert_eq!(bridge.http_get_string(DATA_URL, true), expected);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bin");
    assert_eq!(
        bridge.http_download(DATA_URL, path.to_str().unwrap(), true),
        expected
    );
    assert!(!path.exists());

    let err = bridge.http_get_binary(DATA_URL, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TokenMissingOrExpired);
}

#[test]
fn test_failed_init_keeps_previous_token() {
    let mut http = MockHttpClient::new();
    let mut seq = mockall::Sequence::new();
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| ok(r#"{"access_token":"first","expires_in":3600}"#));
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(HttpResponse::new(500, "identity provider down")));
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| ok(r#"{"token_type":"Bearer"}"#));
    http.expect_execute()
        .withf(|req| req.header_value("Authorization") == Some("Bearer first"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| ok("still works"));

    let bridge = bridge_with_http(http);
    bridge.http_init_token(TOKEN_URL, "client", "secret");

    let failed = bridge.http_init_token(TOKEN_URL, "client", "secret");
    assert!(failed.starts_with("ERROR (HttpStatusFailure):"), "{}", failed);

    let malformed = bridge.http_init_token(TOKEN_URL, "client", "secret");
    assert!(malformed.starts_with("ERROR (PayloadShapeFailure):"), "{}", malformed);

    assert_eq!(bridge.http_get_string(DATA_URL, true), "still works");
}

#[test]
fn test_init_token_without_expiry_uses_fallback_window() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| ok(r#"{"access_token":"abc"}"#));

    assert_eq!(
        bridge_with_http(http).http_init_token(TOKEN_URL, "client", "secret"),
        "Token saved and good for 1800 seconds."
    );
}

#[test]
fn test_get_token_returns_raw_token_and_caches_it() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.url == TOKEN_URL)
        .times(1)
        .returning(|_| ok(r#"{"access_token":"raw-token","expires_in":300}"#));

    let bridge = bridge_with_http(http);
    assert_eq!(bridge.http_get_token(TOKEN_URL, "client", "secret"), "raw-token");
    assert_eq!(
        bridge.service().token_cache().current().unwrap().token,
        "raw-token"
    );
}

#[test]
fn test_set_token_stores_caller_token() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.header_value("Authorization") == Some("Bearer manual"))
        .times(1)
        .returning(|_| ok("ok"));

    let bridge = bridge_with_http(http);
    assert_eq!(
        bridge.set_token(""),
        "ERROR (InvalidArgument): Token cannot be empty."
    );
    assert_eq!(bridge.set_token("manual"), "Token saved and good for 1800 seconds.");
    assert_eq!(bridge.http_get_string(DATA_URL, true), "ok");
}

#[test]
fn test_get_with_explicit_token_leaves_cache_alone() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| req.header_value("Authorization") == Some("Bearer explicit"))
        .times(1)
        .returning(|_| ok("body"));

    let bridge = bridge_with_http(http);
    assert_eq!(bridge.http_get_with_token(DATA_URL, "explicit"), "body");
    assert!(bridge.service().token_cache().current().is_none());
    assert_eq!(
        bridge.http_get_with_token(DATA_URL, ""),
        "ERROR (InvalidArgument): Token cannot be empty."
    );
}

#[test]
fn test_http_post_uses_form_content_type_by_default() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|req| {
            req.method == bridge_traits::HttpMethod::Post
                && req.header_value("Content-Type")
                    == Some("application/x-www-form-urlencoded; charset=utf-8")
                && req.body.as_deref() == Some(&b"a=1&b=2"[..])
        })
        .times(1)
        .returning(|_| ok("created"));
    http.expect_execute()
        .withf(|req| req.header_value("Content-Type") == Some("application/json; charset=utf-8"))
        .times(1)
        .returning(|_| Ok(HttpResponse::new(400, "bad json")));

    let bridge = bridge_with_http(http);
    assert_eq!(bridge.http_post(DATA_URL, "a=1&b=2", None), "created");

    let text = bridge.http_post(DATA_URL, "{", Some("application/json"));
    assert!(text.starts_with("ERROR (HttpStatusFailure):"), "{}", text);
    assert!(text.contains("bad json"));
}

#[test]
fn test_http_get_binary_returns_bytes_or_error() {
    let mut http = MockHttpClient::new();
    let mut seq = mockall::Sequence::new();
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(HttpResponse::new(200, Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47]))));
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(HttpResponse::new(200, Bytes::new())));
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(BridgeError::Timeout("request timed out".to_string())));

    let bridge = bridge_with_http(http);
    assert_eq!(
        bridge.http_get_binary(DATA_URL, false).unwrap(),
        Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47])
    );
    assert!(bridge.http_get_binary(DATA_URL, false).unwrap().is_empty());

    let err = bridge.http_get_binary(DATA_URL, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[test]
fn test_http_download_streams_to_nested_path() {
    let mut http = MockHttpClient::new();
    http.expect_download_stream()
        .withf(|req| req.url == DATA_URL)
        .times(1)
        .returning(|_| Ok(stream_of(b"file contents")));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/file.txt");
    let path_str = path.to_str().unwrap();

    let message = bridge_with_http(http).http_download(DATA_URL, path_str, false);
    assert_eq!(
        message,
        format!("Success: Downloaded '{}' to '{}'", DATA_URL, path_str)
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"file contents");
}

#[test]
fn test_http_download_guards_and_status_failure() {
    let mut http = MockHttpClient::new();
    http.expect_download_stream()
        .times(1)
        .returning(|_| {
            Err(BridgeError::HttpStatus {
                status: 403,
                body: "Forbidden".to_string(),
            })
        });

    let bridge = bridge_with_http(http);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("denied.bin");
    let path_str = path.to_str().unwrap();

    assert_eq!(
        bridge.http_download("", path_str, false),
        "ERROR (InvalidArgument): URL cannot be empty."
    );
    assert_eq!(
        bridge.http_download(DATA_URL, " ", false),
        "ERROR (InvalidArgument): Local file path cannot be empty."
    );

    let text = bridge.http_download(DATA_URL, path_str, false);
    assert!(text.starts_with("ERROR (HttpStatusFailure):"), "{}", text);
    assert!(!path.exists());
}

#[test]
fn test_s3_get_string_is_repeatable() {
    let mut store = MockObjectStore::new();
    store
        .expect_get_object()
        .times(2)
        .returning(|bucket, key| {
            assert_eq!(bucket, "eodata");
            assert_eq!(key, "Sentinel-2/manifest.safe");
            Ok(Bytes::from_static(b"<manifest/>"))
        });

    let bridge = bridge_with_store(store);
    let first = bridge.s3_get_string("s3://eodata/Sentinel-2/manifest.safe");
    let second = bridge.s3_get_string("s3://eodata/Sentinel-2/manifest.safe");
    assert_eq!(first, "<manifest/>");
    assert_eq!(first, second);
}

#[test]
fn test_s3_provider_fault_carries_status_and_request_id() {
    let mut store = MockObjectStore::new();
    store.expect_get_object().returning(|_, _| {
        Err(BridgeError::Storage(
            StorageFault::new("The specified key does not exist.", Some(404))
                .with_code("NoSuchKey")
                .with_request_id("R1"),
        ))
    });

    let text = bridge_with_store(store).s3_get_string("s3://eodata/missing.json");
    assert!(text.starts_with("ERROR (StorageProviderFailure):"), "{}", text);
    assert!(text.contains("NoSuchKey"));
    assert!(text.contains("Request ID: R1"));
    assert!(text.contains("HTTP Status: 404"));
}

#[test]
fn test_s3_download_small_object_uses_single_get() {
    let mut store = MockObjectStore::new();
    store
        .expect_head_object()
        .times(1)
        .returning(|bucket, key| Ok(object_info(bucket, key, 5)));
    store
        .expect_get_object()
        .times(1)
        .returning(|_, _| Ok(Bytes::from_static(b"small")));
    store.expect_get_object_range().never();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/small.txt");
    let path_str = path.to_str().unwrap();

    let message = bridge_with_store(store).s3_download("s3://eodata/small.txt", path_str);
    assert_eq!(
        message,
        format!("Success: Downloaded 's3://eodata/small.txt' to '{}'", path_str)
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"small");
}

#[test]
fn test_s3_download_large_object_in_ranged_parts() {
    const DATA: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut store = MockObjectStore::new();
    store
        .expect_head_object()
        .returning(|bucket, key| Ok(object_info(bucket, key, DATA.len() as u64)));
    store.expect_get_object().never();
    store
        .expect_get_object_range()
        .times(9)
        .returning(|_, _, range| {
            Ok(Bytes::copy_from_slice(
                &DATA[range.start as usize..range.end as usize],
            ))
        });

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");

    let message = bridge_with_store(store).s3_download("s3://eodata/large.bin", path.to_str().unwrap());
    assert!(message.starts_with("Success:"), "{}", message);
    assert_eq!(std::fs::read(&path).unwrap(), DATA);
}

#[test]
fn test_s3_download_short_part_fails_and_removes_file() {
    let mut store = MockObjectStore::new();
    store
        .expect_head_object()
        .returning(|bucket, key| Ok(object_info(bucket, key, 12)));
    store
        .expect_get_object_range()
        .returning(|_, _, _| Ok(Bytes::from_static(b"ab")));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.bin");

    let text = bridge_with_store(store).s3_download("s3://eodata/broken.bin", path.to_str().unwrap());
    assert!(text.starts_with("ERROR (PayloadShapeFailure):"), "{}", text);
    assert!(!path.exists());
}

#[test]
fn test_s3_download_requires_local_path() {
    let mut store = MockObjectStore::new();
    store.expect_head_object().never();

    assert_eq!(
        bridge_with_store(store).s3_download("s3://eodata/a.bin", ""),
        "ERROR (InvalidArgument): Local file path cannot be empty."
    );
}

#[test]
fn test_init_token_with_unusable_expiry_is_payload_error() {
    let mut http = MockHttpClient::new();
    let mut seq = mockall::Sequence::new();
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| ok(r#"{"access_token":"abc","expires_in":9223372036854775807}"#));
    http.expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| ok(r#"{"access_token":"abc","expires_in":-60}"#));

    let bridge = bridge_with_http(http);

    let huge = bridge.http_init_token(TOKEN_URL, "client", "secret");
    assert!(huge.starts_with("ERROR (PayloadShapeFailure):"), "{}", huge);

    let negative = bridge.http_init_token(TOKEN_URL, "client", "secret");
    assert!(negative.starts_with("ERROR (PayloadShapeFailure):"), "{}", negative);

    assert!(bridge.service().token_cache().current().is_none());
}

#[test]
fn test_out_of_range_fallback_validity_is_rejected_at_build() {
    let result = core_runtime::config::BridgeConfig::builder()
        .http_client(Arc::new(MockHttpClient::new()))
        .object_store(Arc::new(MockObjectStore::new()))
        .token_fallback_validity(std::time::Duration::from_secs(u64::MAX))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_set_token_with_unrepresentable_window_does_not_unwind() {
    let clock = clock();
    let cache = core_auth::TokenCache::new(
        Arc::new(MockHttpClient::new()),
        clock,
        std::time::Duration::from_secs(u64::MAX),
    );
    let err = core_service::OperationError::from(cache.set_token("tok").unwrap_err());
    assert_eq!(err.kind(), ErrorKind::BridgeFailure);
    assert!(cache.current().is_none());
}

struct ExplodingHttpClient;

#[async_trait::async_trait]
impl bridge_traits::HttpClient for ExplodingHttpClient {
    async fn execute(&self, _request: bridge_traits::HttpRequest) -> bridge_traits::error::Result<HttpResponse> {
        panic!("collaborator exploded")
    }

    async fn download_stream(
        &self,
        _request: bridge_traits::HttpRequest,
    ) -> bridge_traits::error::Result<bridge_traits::BodyStream> {
        panic!("collaborator exploded")
    }
}

#[test]
fn test_panic_in_collaborator_is_reported_not_unwound() {
    let config = core_runtime::config::BridgeConfig::builder()
        .http_client(Arc::new(ExplodingHttpClient))
        .object_store(Arc::new(MockObjectStore::new()))
        .clock(clock())
        .build()
        .unwrap();
    let bridge = core_service::HostBridge::from_config(config).unwrap();

    let text = bridge.http_get(DATA_URL);
    assert!(text.starts_with("ERROR (BridgeFailure):"), "{}", text);
    assert!(text.contains("collaborator exploded"));

    // The runtime survives a panicked task.
    let again = bridge.http_get(DATA_URL);
    assert!(again.starts_with("ERROR (BridgeFailure):"), "{}", again);
}

#[test]
fn test_calling_from_async_context_is_reported() {
    let mut http = MockHttpClient::new();
    http.expect_execute().never();
    let bridge = bridge_with_http(http);

    let outer = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let text = outer.block_on(async { bridge.http_get(DATA_URL) });

    assert!(text.starts_with("ERROR (BridgeFailure):"), "{}", text);
    drop(outer);
}
