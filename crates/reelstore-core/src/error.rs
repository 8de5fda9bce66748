//! Error types module
//!
//! Every failure the ingest pipeline can produce is a variant of `AppError`.
//! Crate-local errors (storage, processing, repository) convert into it, and the
//! API layer renders it through the `ErrorMetadata` description below.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TRANSCODE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Failed to stage upload: {0}")]
    StorageWrite(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Secure randomness unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Storage upload failed: {0}")]
    StorageUpload(String),

    #[error("Failed to persist metadata: {0}")]
    MetadataPersist(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidIdentifier(format!("UUID parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidIdentifier(_) => (
            400,
            "INVALID_IDENTIFIER",
            false,
            Some("Use a valid video UUID"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Provide a valid bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Only the owner of the video may upload to it"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidMediaType(_) => (
            400,
            "INVALID_MEDIA_TYPE",
            false,
            Some("Upload a supported file type"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageWrite(_) => (
            500,
            "STORAGE_WRITE_ERROR",
            true,
            Some("Retry the upload"),
            true,
            LogLevel::Error,
        ),
        AppError::Transcode(_) => (
            500,
            "TRANSCODE_ERROR",
            true,
            Some("Check the file is a valid MP4 and retry"),
            true,
            LogLevel::Error,
        ),
        AppError::Classification(_) => (
            500,
            "CLASSIFICATION_ERROR",
            true,
            Some("Check the file contains a video stream and retry"),
            true,
            LogLevel::Error,
        ),
        AppError::EntropyUnavailable(_) => (
            500,
            "ENTROPY_UNAVAILABLE",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageUpload(_) => (
            500,
            "STORAGE_UPLOAD_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MetadataPersist(_) => (
            500,
            "METADATA_PERSIST_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::RecordNotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the video ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(_) => "Invalid video ID".to_string(),
            AppError::Unauthenticated(_) => "Authentication required".to_string(),
            AppError::Unauthorized(_) => "Not allowed to modify this video".to_string(),
            AppError::InvalidMediaType(msg) => msg.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::StorageWrite(_) => "Failed to save upload".to_string(),
            AppError::Transcode(_) => "Failed to process video".to_string(),
            AppError::Classification(_) => "Failed to inspect video".to_string(),
            AppError::EntropyUnavailable(_) => "Failed to allocate storage key".to_string(),
            AppError::StorageUpload(_) => "Storage upload failed".to_string(),
            AppError::MetadataPersist(_) => "Failed to update video metadata".to_string(),
            AppError::RecordNotFound(_) => "Video not found".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }
}

impl AppError {
    /// Variant name used in logs and non-production error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidMediaType(_) => "InvalidMediaType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::StorageWrite(_) => "StorageWriteError",
            AppError::Transcode(_) => "TranscodeError",
            AppError::Classification(_) => "ClassificationError",
            AppError::EntropyUnavailable(_) => "EntropyUnavailable",
            AppError::StorageUpload(_) => "StorageUploadError",
            AppError::MetadataPersist(_) => "MetadataPersistError",
            AppError::RecordNotFound(_) => "RecordNotFound",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Full internal message, including diagnostic detail such as transcoder stderr.
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }
}
