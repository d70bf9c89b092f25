//! HTTP operations.
//!
//! Every call goes through the one shared [`HttpClient`](bridge_traits::HttpClient),
//! is sent exactly once, and requires a 2xx status.

use crate::error::{ErrorKind, OperationError, Result};
use crate::service::{
    decode_text, ensure_parent_dir, remove_partial, require_non_blank, require_path, with_bearer,
    BearerAuth, BridgeService,
};
use bridge_traits::http::{HttpRequest, FORM_URLENCODED};
use bytes::Bytes;
use core_async::io::{AsyncReadExt, AsyncWriteExt};
use core_runtime::logging::strip_path;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

impl BridgeService {
    /// GET `url` and return the body as text.
    #[instrument(skip(self))]
    pub async fn get_text(&self, url: &str, auth: BearerAuth) -> Result<String> {
        let body = self.get_bytes(url, &auth).await?;
        Ok(decode_text(&body))
    }

    /// GET `url` and return the raw body.
    ///
    /// An empty body is logged but is not a failure.
    #[instrument(skip(self))]
    pub async fn get_binary(&self, url: &str, auth: BearerAuth) -> Result<Bytes> {
        let body = self.get_bytes(url, &auth).await?;
        if body.is_empty() {
            warn!(url, "GET returned an empty body");
        }
        Ok(body)
    }

    /// POST `body` as UTF-8 with the given content type and return the
    /// response text.
    ///
    /// `content_type` defaults to `application/x-www-form-urlencoded`.
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn post_text(
        &self,
        url: &str,
        body: &str,
        content_type: Option<&str>,
    ) -> Result<String> {
        require_non_blank(url, "URL")?;

        let content_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(FORM_URLENCODED);
        let request = HttpRequest::post(url).text_body(body, content_type);

        let response = self.http_client.execute(request).await?.error_for_status()?;
        debug!(status = response.status, bytes = response.body.len(), "POST finished");
        Ok(decode_text(&response.body))
    }

    /// Stream the body of `url` into `path`, creating parent directories.
    ///
    /// The file is only created once the response headers arrived with a
    /// 2xx status, and is removed again if the transfer fails midway.
    /// Returns the number of bytes written.
    #[instrument(skip(self, path), fields(file = %strip_path(&path.to_string_lossy())))]
    pub async fn download(&self, url: &str, path: &Path, auth: BearerAuth) -> Result<u64> {
        require_non_blank(url, "URL")?;
        require_path(path)?;
        let bearer = self.resolve_bearer(&auth)?;

        ensure_parent_dir(path).await?;

        let request = with_bearer(HttpRequest::get(url), bearer);
        let mut reader = self.http_client.download_stream(request).await?;
        let mut file = tokio::fs::File::create(path).await?;

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;
        let outcome: Result<()> = async {
            loop {
                let read = reader.read(&mut buffer).await.map_err(|e| {
                    OperationError::new(
                        ErrorKind::TransportFailure,
                        format!("Download interrupted after {} bytes: {}", written, e),
                    )
                    .with_source(e)
                })?;
                if read == 0 {
                    break;
                }
                file.write_all(&buffer[..read]).await?;
                written += read as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = outcome {
            drop(file);
            remove_partial(path).await;
            return Err(e);
        }

        info!(url, bytes = written, "Download finished");
        Ok(written)
    }

    async fn get_bytes(&self, url: &str, auth: &BearerAuth) -> Result<Bytes> {
        require_non_blank(url, "URL")?;
        let bearer = self.resolve_bearer(auth)?;

        let request = with_bearer(HttpRequest::get(url), bearer);
        let response = self.http_client.execute(request).await?.error_for_status()?;

        debug!(status = response.status, bytes = response.body.len(), "GET finished");
        Ok(response.body)
    }
}
