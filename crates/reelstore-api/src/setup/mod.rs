//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use crate::auth::JwtService;
use crate::state::AppState;
use anyhow::{Context, Result};
use reelstore_core::Config;
use reelstore_processing::{FfmpegRemuxer, FfprobeProber, IngestPipeline};
use reelstore_storage::{create_storage, create_thumbnail_storage};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let config = Arc::new(config);
    let repository = database::setup_repository(&config).await?;

    let video_storage = create_storage(&config)
        .await
        .context("Failed to initialize video storage")?;
    let thumbnail_storage = create_thumbnail_storage(&config)
        .await
        .context("Failed to initialize thumbnail storage")?;

    let pipeline = IngestPipeline::new(
        config.clone(),
        repository,
        video_storage.clone(),
        thumbnail_storage,
        Arc::new(FfmpegRemuxer::new(config.ffmpeg_path.clone())),
        Arc::new(FfprobeProber::new(config.ffprobe_path.clone())),
    );

    let state = Arc::new(AppState {
        jwt: JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()),
        config: config.clone(),
        pipeline: Arc::new(pipeline),
        video_storage,
    });

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
