//! Object-store operations.
//!
//! Locators are parsed before any network traffic. Downloads of objects
//! larger than the multipart threshold are fetched as ranged parts with
//! bounded concurrency and written to disk in order.

use crate::error::{ErrorKind, OperationError, Result};
use crate::locator::ResourceLocator;
use crate::service::{decode_text, ensure_parent_dir, remove_partial, require_path, BridgeService};
use bytes::Bytes;
use core_async::io::AsyncWriteExt;
use core_runtime::logging::strip_path;
use futures_util::stream::{self, StreamExt};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, instrument};

impl BridgeService {
    /// Fetch an `s3://bucket/key` object and decode it as UTF-8 text.
    #[instrument(skip(self))]
    pub async fn s3_get_string(&self, locator: &str) -> Result<String> {
        let (bucket, key) = ResourceLocator::parse_s3(locator)?;

        let data = self.object_store.get_object(&bucket, &key).await?;
        debug!(bucket = %bucket, key = %key, bytes = data.len(), "Object fetched");
        Ok(decode_text(&data))
    }

    /// Download an `s3://bucket/key` object to `path`.
    ///
    /// Returns the number of bytes written. A partially written file is
    /// removed on failure.
    #[instrument(skip(self, path), fields(file = %strip_path(&path.to_string_lossy())))]
    pub async fn s3_download(&self, locator: &str, path: &Path) -> Result<u64> {
        let (bucket, key) = ResourceLocator::parse_s3(locator)?;
        require_path(path)?;

        ensure_parent_dir(path).await?;

        let info = self.object_store.head_object(&bucket, &key).await?;
        let mut file = tokio::fs::File::create(path).await?;

        let outcome = if info.size > self.transfer.multipart_threshold {
            self.write_in_parts(&bucket, &key, info.size, &mut file).await
        } else {
            self.write_whole(&bucket, &key, &mut file).await
        };

        let written = match outcome {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                remove_partial(path).await;
                return Err(e);
            }
        };

        info!(bucket = %bucket, key = %key, bytes = written, "Object downloaded");
        Ok(written)
    }

    async fn write_whole(
        &self,
        bucket: &str,
        key: &str,
        file: &mut tokio::fs::File,
    ) -> Result<u64> {
        let data = self.object_store.get_object(bucket, key).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(data.len() as u64)
    }

    async fn write_in_parts(
        &self,
        bucket: &str,
        key: &str,
        size: u64,
        file: &mut tokio::fs::File,
    ) -> Result<u64> {
        let ranges = part_ranges(size, self.transfer.part_size);
        debug!(
            parts = ranges.len(),
            part_size = self.transfer.part_size,
            concurrency = self.transfer.concurrency,
            "Starting ranged download"
        );

        let store = self.object_store.as_ref();
        let mut parts = stream::iter(ranges)
            .map(|range| async move {
                let expected = range.end - range.start;
                let first = range.start;
                let data: Bytes = store
                    .get_object_range(bucket, key, range)
                    .await
                    .map_err(OperationError::from)?;
                if data.len() as u64 != expected {
                    return Err(OperationError::new(
                        ErrorKind::PayloadShapeFailure,
                        format!(
                            "Ranged read at offset {} returned {} bytes, expected {}",
                            first,
                            data.len(),
                            expected
                        ),
                    ));
                }
                Ok::<_, OperationError>(data)
            })
            .buffered(self.transfer.concurrency);

        let mut written: u64 = 0;
        while let Some(part) = parts.next().await {
            let data = part?;
            file.write_all(&data).await?;
            written += data.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Split `0..size` into consecutive ranges of at most `part_size` bytes.
fn part_ranges(size: u64, part_size: u64) -> Vec<Range<u64>> {
    let part_size = part_size.max(1);
    (0..size.div_ceil(part_size))
        .map(|index| {
            let start = index * part_size;
            start..(start + part_size).min(size)
        })
        .collect()
}
