//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use reelstore_core::AppError;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EntropyUnavailable(msg) => AppError::EntropyUnavailable(msg),
            StorageError::NotFound(msg) => AppError::RecordNotFound(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::StorageUpload(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Backends are shared across concurrent requests and must not need external
/// locking. Keys are produced by [`crate::keys::generate_storage_key`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store the whole object under `storage_key` in a single attempt and
    /// return its public URL.
    ///
    /// The reader is consumed until EOF. No retries, no chunking: a failure
    /// leaves nothing addressable under the key.
    async fn put_object(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Public URL under which `storage_key` is addressable. Pure function of
    /// the backend configuration and the key.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
