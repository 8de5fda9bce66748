use reelstore_core::AppError;

/// Failures raised by the local processing stages.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("{0}")]
    InvalidMediaType(String),

    #[error("File too large: more than {max} bytes")]
    PayloadTooLarge { max: u64 },

    #[error("{0}")]
    StorageWrite(String),

    #[error("{0}")]
    Transcode(String),

    #[error("{0}")]
    Classification(String),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::InvalidMediaType(msg) => AppError::InvalidMediaType(msg),
            e @ ProcessingError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            ProcessingError::StorageWrite(msg) => AppError::StorageWrite(msg),
            ProcessingError::Transcode(msg) => AppError::Transcode(msg),
            ProcessingError::Classification(msg) => AppError::Classification(msg),
        }
    }
}
