//! HTTP Client Abstraction
//!
//! Request/response types and the async client trait the bridge composes.
//! Implementations only move bytes: status handling, bearer tokens and error
//! normalization live in the calling layer.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{BridgeError, Result};

/// Content type used for form posts when the caller does not name one.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Attach a UTF-8 text body with the given content type.
    ///
    /// A content type without a charset gets `; charset=utf-8` appended.
    pub fn text_body(mut self, body: impl Into<String>, content_type: &str) -> Self {
        let content_type = if content_type.to_ascii_lowercase().contains("charset=") {
            content_type.to_string()
        } else {
            format!("{}; charset=utf-8", content_type)
        };
        self.body = Some(Bytes::from(body.into()));
        self.headers.insert("Content-Type".to_string(), content_type);
        self
    }

    /// Attach an `application/x-www-form-urlencoded` body built from pairs.
    pub fn form<T: Serialize + ?Sized>(mut self, fields: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(fields).map_err(|e| {
            BridgeError::InvalidRequest(format!("Form encoding failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers
            .insert("Content-Type".to_string(), FORM_URLENCODED.to_string());
        Ok(self)
    }

    /// Look up a header by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`BridgeError::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BridgeError::HttpStatus {
                status: self.status,
                body: self.text_lossy(),
            })
        }
    }
}

/// Streamed response body, read incrementally as it arrives.
pub type BodyStream = Box<dyn core_async::io::AsyncRead + Send + Unpin>;

/// Async HTTP client trait
///
/// Implementations must:
/// - reuse one connection pool for every call
/// - apply their configured connect and request timeouts
/// - never retry on their own
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch_data(client: &dyn HttpClient) -> Result<String> {
///     let request = HttpRequest::get("https://api.example.com/data").bearer_token("token");
///     let response = client.execute(request).await?.error_for_status()?;
///     Ok(response.text_lossy())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a request and buffer the full response body.
    ///
    /// Non-2xx statuses are returned as a response, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The URL is malformed
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a request and hand back the body as a stream once the
    /// response headers have arrived.
    ///
    /// This is useful for large files that should not be loaded entirely into
    /// memory. Non-2xx statuses are reported as [`BridgeError::HttpStatus`].
    async fn download_stream(&self, request: HttpRequest) -> Result<BodyStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::get("https://example.com")
            .header("User-Agent", "test")
            .bearer_token("secret");

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(request.header_value("authorization"), Some("Bearer secret"));
    }

    #[test]
    fn test_text_body_appends_charset() {
        let request = HttpRequest::post("https://example.com").text_body("{}", "application/json");
        assert_eq!(
            request.header_value("Content-Type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(request.body, Some(Bytes::from("{}")));

        let request = HttpRequest::post("https://example.com")
            .text_body("a=1", "text/plain; charset=ISO-8859-1");
        assert_eq!(
            request.header_value("content-type"),
            Some("text/plain; charset=ISO-8859-1")
        );
    }

    #[test]
    fn test_form_body() {
        let request = HttpRequest::post("https://auth.example.com/token")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", "my id"),
                ("client_secret", "s&cret"),
            ])
            .unwrap();

        assert_eq!(request.header_value("Content-Type"), Some(FORM_URLENCODED));
        assert_eq!(
            request.body.unwrap(),
            Bytes::from("grant_type=client_credentials&client_id=my+id&client_secret=s%26cret")
        );
    }

    #[test]
    fn test_http_response_status_checks() {
        let response = HttpResponse::new(200, "test");

        assert!(response.is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(response.error_for_status().is_ok());
    }

    #[test]
    fn test_error_for_status_keeps_body() {
        let response = HttpResponse::new(404, "not here");
        match response.error_for_status() {
            Err(BridgeError::HttpStatus { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "not here");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
