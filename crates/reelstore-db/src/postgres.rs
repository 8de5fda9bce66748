use crate::repository::{DbError, DbResult, VideoRepository};
use async_trait::async_trait;
use reelstore_core::models::VideoRecord;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Postgres-backed video repository (`videos` table, see `migrations/`).
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations from the workspace `migrations/` directory.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> DbResult<Option<VideoRecord>> {
        let row = sqlx::query_as::<Postgres, VideoRecord>(
            "SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at \
             FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.record_id = %video.id))]
    async fn update_video(&self, video: &VideoRecord) -> DbResult<VideoRecord> {
        let row = sqlx::query_as::<Postgres, VideoRecord>(
            "UPDATE videos \
             SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at",
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound(video.id))
    }
}
