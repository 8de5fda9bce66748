use async_trait::async_trait;
use reelstore_core::models::VideoRecord;
use reelstore_core::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Video not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => AppError::RecordNotFound(id.to_string()),
            DbError::Database(e) => AppError::Internal(format!("Database error: {}", e)),
        }
    }
}

/// Record store for video metadata.
///
/// Both operations are atomic at single-record granularity; implementations
/// must be safe to share across concurrent requests.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> DbResult<Option<VideoRecord>>;

    /// Persist the whole record, replacing what is stored under `video.id`.
    /// Returns the stored record (with a refreshed `updated_at`).
    async fn update_video(&self, video: &VideoRecord) -> DbResult<VideoRecord>;
}
