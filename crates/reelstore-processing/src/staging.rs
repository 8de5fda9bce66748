//! Request-scoped temporary files.
//!
//! A [`StagedFile`] owns a uniquely named file under the upload temp dir. The
//! file is removed when the value is dropped, on success, error and unwind
//! alike.

use crate::error::{ProcessingError, ProcessingResult};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io::SeekFrom;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

const STAGE_PREFIX: &str = "reelstore-upload-";
const STAGE_SUFFIX: &str = ".mp4";

pub struct StagedFile {
    file: File,
    path: TempPath,
    size: u64,
}

impl StagedFile {
    /// Copy `stream` into a new temporary file under `dir`.
    ///
    /// Fails with `PayloadTooLarge` as soon as more than `max_bytes` have been
    /// received, and with `StorageWrite` if the file cannot be created or
    /// written or the stream breaks off. The returned handle is positioned at
    /// the start of the file.
    #[tracing::instrument(skip(dir, stream), fields(dir = %dir.display()))]
    pub async fn stage<S>(dir: &Path, stream: S, max_bytes: u64) -> ProcessingResult<Self>
    where
        S: Stream<Item = Result<Bytes, ProcessingError>>,
    {
        let start = std::time::Instant::now();

        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            ProcessingError::StorageWrite(format!(
                "Failed to create temp directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let named = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .suffix(STAGE_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| ProcessingError::StorageWrite(format!("Failed to create temp file: {}", e)))?;

        // From here on `path` removes the file when dropped.
        let (std_file, path) = named.into_parts();
        let mut file = File::from_std(std_file);

        let mut size: u64 = 0;
        futures::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            size += chunk.len() as u64;
            if size > max_bytes {
                return Err(ProcessingError::PayloadTooLarge { max: max_bytes });
            }
            file.write_all(&chunk).await.map_err(|e| {
                ProcessingError::StorageWrite(format!("Failed to write upload to disk: {}", e))
            })?;
        }

        file.flush()
            .await
            .and(file.sync_all().await)
            .map_err(|e| ProcessingError::StorageWrite(format!("Failed to flush upload: {}", e)))?;
        file.seek(SeekFrom::Start(0))
            .await
            .map_err(|e| ProcessingError::StorageWrite(format!("Failed to rewind upload: {}", e)))?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(Self { file, path, size })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read up to `len` leading bytes and rewind to the start.
    pub async fn read_head(&mut self, len: usize) -> ProcessingResult<Vec<u8>> {
        let read_err =
            |e: std::io::Error| ProcessingError::StorageWrite(format!("Failed to read upload: {}", e));

        let mut head = Vec::with_capacity(len);
        (&mut self.file)
            .take(len as u64)
            .read_to_end(&mut head)
            .await
            .map_err(read_err)?;
        self.file
            .seek(SeekFrom::Start(0))
            .await
            .map_err(read_err)?;
        Ok(head)
    }
}
