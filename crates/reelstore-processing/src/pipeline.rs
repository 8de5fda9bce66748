//! Upload ingest pipeline.
//!
//! Video: authorize → validate → stage → remux → probe/classify → key →
//! upload → commit. Thumbnails skip the video-only stages and are written to
//! the assets directory. Every stage fails fast; nothing is retried here.

use crate::error::ProcessingError;
use crate::staging::StagedFile;
use crate::validator::{sniff_magic_bytes, validate_media_type};
use crate::video::{classify, Prober, Remuxer};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reelstore_core::models::{AssetClass, MediaType, VideoRecord};
use reelstore_core::{AppError, Config};
use reelstore_db::VideoRepository;
use reelstore_storage::{generate_storage_key, KeyNamespace, Storage};
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

/// Leading bytes inspected when content sniffing is enabled.
const SNIFF_LEN: usize = 16;

pub type UploadStream<'a> = BoxStream<'a, Result<Bytes, ProcessingError>>;

/// One upload, alive for the duration of a single request.
pub struct UploadRequest<'a> {
    pub asset: AssetClass,
    /// Client-declared `Content-Type` of the uploaded part.
    pub content_type: String,
    pub video_id: Uuid,
    /// Authenticated user id.
    pub principal: Uuid,
    pub body: UploadStream<'a>,
}

#[derive(Clone)]
pub struct IngestPipeline {
    config: Arc<Config>,
    repository: Arc<dyn VideoRepository>,
    video_storage: Arc<dyn Storage>,
    thumbnail_storage: Arc<dyn Storage>,
    remuxer: Arc<dyn Remuxer>,
    prober: Arc<dyn Prober>,
    transcode_permits: Arc<Semaphore>,
}

impl IngestPipeline {
    pub fn new(
        config: Arc<Config>,
        repository: Arc<dyn VideoRepository>,
        video_storage: Arc<dyn Storage>,
        thumbnail_storage: Arc<dyn Storage>,
        remuxer: Arc<dyn Remuxer>,
        prober: Arc<dyn Prober>,
    ) -> Self {
        let transcode_permits = Arc::new(Semaphore::new(config.max_concurrent_transcodes.max(1)));
        Self {
            config,
            repository,
            video_storage,
            thumbnail_storage,
            remuxer,
            prober,
            transcode_permits,
        }
    }

    /// Load the record and check that `principal` owns it.
    ///
    /// Runs before any other stage: on failure no file has been touched and no
    /// external process has been started.
    pub async fn authorize(&self, video_id: Uuid, principal: Uuid) -> Result<VideoRecord, AppError> {
        let record = self
            .repository
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::RecordNotFound(video_id.to_string()))?;

        if !record.is_owned_by(principal) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %principal,
                "Rejected upload from non-owner"
            );
            return Err(AppError::Unauthorized(format!(
                "user {} does not own video {}",
                principal, video_id
            )));
        }

        Ok(record)
    }

    pub async fn ingest(&self, request: UploadRequest<'_>) -> Result<VideoRecord, AppError> {
        match request.asset {
            AssetClass::Video => self.ingest_video(request).await,
            AssetClass::Thumbnail => self.ingest_thumbnail(request).await,
        }
    }

    #[tracing::instrument(skip(self, request), fields(
        video_id = %request.video_id,
        user_id = %request.principal,
        asset = "video"
    ))]
    pub async fn ingest_video(&self, request: UploadRequest<'_>) -> Result<VideoRecord, AppError> {
        let start = std::time::Instant::now();
        let record = self.authorize(request.video_id, request.principal).await?;

        let media_type = validate_media_type(AssetClass::Video, &request.content_type)?;

        let mut staged = StagedFile::stage(
            &self.config.upload_temp_dir,
            request.body,
            self.config.max_video_size_bytes as u64,
        )
        .await?;

        if self.config.content_sniffing_enabled {
            let head = staged.read_head(SNIFF_LEN).await?;
            sniff_magic_bytes(&media_type, &head)?;
        }

        // Past this point the upload has been received in full. The remaining
        // stages run on their own task so a client disconnect cannot stop them
        // between upload and commit, or leave ffmpeg running unsupervised.
        let pipeline = self.clone();
        let task = tokio::spawn(
            async move { pipeline.process_staged_video(record, media_type, staged).await }
                .instrument(tracing::Span::current()),
        );
        let record = task
            .await
            .map_err(|e| AppError::Internal(format!("Video processing task failed: {}", e)))??;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(record)
    }

    /// Remux, classify, upload and commit a fully staged video.
    ///
    /// Holds one admission permit from remux until the upload returns, which
    /// also bounds how many processed files are being read into the object
    /// store at once.
    async fn process_staged_video(
        &self,
        mut record: VideoRecord,
        media_type: MediaType,
        staged: StagedFile,
    ) -> Result<VideoRecord, AppError> {
        let permit = self
            .transcode_permits
            .acquire()
            .await
            .map_err(|e| AppError::Internal(format!("Transcode limiter closed: {}", e)))?;

        let remuxed = self.remuxer.remux(staged.path()).await?;
        let geometry = self.prober.probe(remuxed.path()).await?;
        let staged_size = staged.size();
        drop(staged);

        let orientation = classify(geometry.width, geometry.height);
        tracing::info!(
            width = geometry.width,
            height = geometry.height,
            orientation = %orientation,
            "Video classified"
        );

        let key = generate_storage_key(
            KeyNamespace::Orientation(orientation),
            &media_type.extension,
        )?
        .to_string();

        let file = tokio::fs::File::open(remuxed.path()).await.map_err(|e| {
            AppError::StorageUpload(format!("Failed to open processed file: {}", e))
        })?;
        let content_length = file.metadata().await.ok().map(|m| m.len());

        let url = self
            .video_storage
            .put_object(&key, &media_type.essence, content_length, Box::pin(file))
            .await?;
        drop(permit);
        drop(remuxed);

        record.video_url = Some(url);
        let record = self.commit(record, &key).await?;

        tracing::info!(key = %key, size_bytes = staged_size, "Video stored");

        Ok(record)
    }

    #[tracing::instrument(skip(self, request), fields(
        video_id = %request.video_id,
        user_id = %request.principal,
        asset = "thumbnail"
    ))]
    pub async fn ingest_thumbnail(&self, request: UploadRequest<'_>) -> Result<VideoRecord, AppError> {
        let mut record = self.authorize(request.video_id, request.principal).await?;

        let media_type = validate_media_type(AssetClass::Thumbnail, &request.content_type)?;

        let data = collect_limited(request.body, self.config.max_thumbnail_size_bytes).await?;

        if self.config.content_sniffing_enabled {
            sniff_magic_bytes(&media_type, &data)?;
        }

        let key = generate_storage_key(KeyNamespace::Root, &media_type.extension)?.to_string();
        let size = data.len() as u64;

        let url = self
            .thumbnail_storage
            .put_object(&key, &media_type.essence, Some(size), Box::pin(Cursor::new(data)))
            .await?;

        record.thumbnail_url = Some(url);
        let record = self.commit(record, &key).await?;

        tracing::info!(key = %key, size_bytes = size, "Thumbnail ingested");

        Ok(record)
    }

    /// Persist the record after a confirmed upload.
    ///
    /// A failure here leaves the object at `key` unreferenced. It is logged for
    /// reconciliation and not deleted.
    async fn commit(&self, record: VideoRecord, key: &str) -> Result<VideoRecord, AppError> {
        self.repository.update_video(&record).await.map_err(|e| {
            tracing::error!(
                video_id = %record.id,
                orphaned_key = %key,
                error = %e,
                "Metadata commit failed after upload; stored object is orphaned"
            );
            AppError::MetadataPersist(e.to_string())
        })
    }
}

/// Buffer a small upload in memory, failing once it exceeds `max_bytes`.
async fn collect_limited(
    mut body: UploadStream<'_>,
    max_bytes: usize,
) -> Result<Vec<u8>, ProcessingError> {
    let mut data = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > max_bytes {
            return Err(ProcessingError::PayloadTooLarge {
                max: max_bytes as u64,
            });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
