use crate::repository::{DbError, DbResult, VideoRepository};
use async_trait::async_trait;
use chrono::Utc;
use reelstore_core::models::VideoRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local video repository.
///
/// Used when no `DATABASE_URL` is configured and by tests. Cloning shares the
/// underlying map.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, replacing any existing one with the same id.
    pub async fn insert(&self, video: VideoRecord) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> DbResult<Option<VideoRecord>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &VideoRecord) -> DbResult<VideoRecord> {
        let mut videos = self.videos.write().await;
        let stored = videos.get_mut(&video.id).ok_or(DbError::NotFound(video.id))?;

        *stored = VideoRecord {
            updated_at: Utc::now(),
            ..video.clone()
        };

        Ok(stored.clone())
    }
}
