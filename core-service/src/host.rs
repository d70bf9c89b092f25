//! Blocking host surface.
//!
//! [`HostBridge`] is what a synchronous, single-threaded host calls. Each
//! method runs the matching [`BridgeService`] operation on the bridge
//! runtime's worker threads and blocks until the result is fully determined.
//!
//! These methods must not be called from inside an async context; doing so
//! is reported as a `BridgeFailure` rather than deadlocking.

use crate::error::Result;
use crate::policy::{propagate, render_text, HostOperation};
use crate::service::{BearerAuth, BridgeService};
use bytes::Bytes;
use core_async::BlockingRuntime;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Blocking adapter over [`BridgeService`].
pub struct HostBridge {
    service: Arc<BridgeService>,
    runtime: BlockingRuntime,
}

impl HostBridge {
    pub fn with_runtime(service: Arc<BridgeService>, runtime: BlockingRuntime) -> Self {
        Self { service, runtime }
    }

    /// The async core, for embedders that have their own runtime.
    pub fn service(&self) -> Arc<BridgeService> {
        Arc::clone(&self.service)
    }

    fn run<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(Arc<BridgeService>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        self.runtime.run(operation(service))?
    }

    /// GET `url` and return the body text.
    pub fn http_get(&self, url: &str) -> String {
        let url = url.to_string();
        let result = self.run(move |svc| async move { svc.get_text(&url, BearerAuth::None).await });
        render_text(HostOperation::HttpGet, result)
    }

    /// POST `body` and return the response text. `content_type` defaults to
    /// `application/x-www-form-urlencoded`.
    pub fn http_post(&self, url: &str, body: &str, content_type: Option<&str>) -> String {
        let url = url.to_string();
        let body = body.to_string();
        let content_type = content_type.map(str::to_string);
        let result = self.run(move |svc| async move {
            svc.post_text(&url, &body, content_type.as_deref()).await
        });
        render_text(HostOperation::HttpPost, result)
    }

    /// Acquire a token, store it, and return the raw access token.
    pub fn http_get_token(&self, token_url: &str, client_id: &str, client_secret: &str) -> String {
        let (token_url, client_id, client_secret) =
            (token_url.to_string(), client_id.to_string(), client_secret.to_string());
        let result = self.run(move |svc| async move {
            svc.acquire_token(&token_url, &client_id, &client_secret)
                .await
                .map(|grant| grant.access_token)
        });
        render_text(HostOperation::HttpGetToken, result)
    }

    /// Acquire a token, store it, and describe its validity window.
    pub fn http_init_token(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> String {
        let (token_url, client_id, client_secret) =
            (token_url.to_string(), client_id.to_string(), client_secret.to_string());
        let result = self.run(move |svc| async move {
            svc.acquire_token(&token_url, &client_id, &client_secret)
                .await
                .map(|grant| token_saved_message(grant.valid_for_secs))
        });
        render_text(HostOperation::HttpInitToken, result)
    }

    /// Store a caller-supplied token for the fallback validity window.
    pub fn set_token(&self, token: &str) -> String {
        let result = self.service.set_token(token).map(token_saved_message);
        render_text(HostOperation::SetToken, result)
    }

    /// GET `url` with an explicit bearer token, leaving the cache alone.
    pub fn http_get_with_token(&self, url: &str, token: &str) -> String {
        let url = url.to_string();
        let auth = BearerAuth::Explicit(token.to_string());
        let result = self.run(move |svc| async move { svc.get_text(&url, auth).await });
        render_text(HostOperation::HttpGetWithToken, result)
    }

    /// GET `url` as text, optionally with the cached token.
    pub fn http_get_string(&self, url: &str, use_token: bool) -> String {
        let url = url.to_string();
        let auth = BearerAuth::cached_if(use_token);
        let result = self.run(move |svc| async move { svc.get_text(&url, auth).await });
        render_text(HostOperation::HttpGetString, result)
    }

    /// GET `url` as raw bytes, optionally with the cached token.
    ///
    /// Failures are returned as errors, never as sentinel bytes.
    pub fn http_get_binary(&self, url: &str, use_token: bool) -> Result<Bytes> {
        let url = url.to_string();
        let auth = BearerAuth::cached_if(use_token);
        let result = self.run(move |svc| async move { svc.get_binary(&url, auth).await });
        propagate(HostOperation::HttpGetBinary, result)
    }

    /// Stream `url` into `local_path`, optionally with the cached token.
    pub fn http_download(&self, url: &str, local_path: &str, use_token: bool) -> String {
        let owned_url = url.to_string();
        let path = PathBuf::from(local_path);
        let auth = BearerAuth::cached_if(use_token);
        let result = self
            .run(move |svc| async move { svc.download(&owned_url, &path, auth).await })
            .map(|_| downloaded_message(url, local_path));
        render_text(HostOperation::HttpDownload, result)
    }

    /// Fetch an `s3://bucket/key` object as text.
    pub fn s3_get_string(&self, s3_url: &str) -> String {
        let s3_url = s3_url.to_string();
        let result = self.run(move |svc| async move { svc.s3_get_string(&s3_url).await });
        render_text(HostOperation::S3GetString, result)
    }

    /// Download an `s3://bucket/key` object to `local_path`.
    pub fn s3_download(&self, s3_url: &str, local_path: &str) -> String {
        let owned_url = s3_url.to_string();
        let path = PathBuf::from(local_path);
        let result = self
            .run(move |svc| async move { svc.s3_download(&owned_url, &path).await })
            .map(|_| downloaded_message(s3_url, local_path));
        render_text(HostOperation::S3Download, result)
    }
}

fn token_saved_message(valid_for_secs: i64) -> String {
    format!("Token saved and good for {} seconds.", valid_for_secs)
}

fn downloaded_message(source: &str, local_path: &str) -> String {
    format!("Success: Downloaded '{}' to '{}'", source, local_path)
}
