//! Route configuration and setup

use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::error::hide_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Json, Router,
};
use reelstore_core::{Config, StorageBackend};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let mut app = public_routes()
        .merge(upload_routes(config))
        .merge(video_routes())
        .nest_service("/assets", ServeDir::new(&config.assets_root));

    // Video objects written by the local backend are served from the same process.
    if config.storage_backend == StorageBackend::Local {
        app = app.nest_service("/media", ServeDir::new(&config.local_storage_path));
    }

    app.layer(axum::middleware::from_fn_with_state(
        state.config.clone(),
        hide_error_details,
    ))
    .layer(setup_cors())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Upload routes. Each carries a body limit sized for its asset class so the
/// multipart reader stops early on oversized streams.
fn upload_routes(config: &Config) -> Router<Arc<AppState>> {
    let video_limit = body_limit(config.max_video_size_bytes);
    let thumbnail_limit = body_limit(config.max_thumbnail_size_bytes);

    Router::new()
        .route(
            &format!("{}/video_upload/{{video_id}}", API_PREFIX),
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            &format!("{}/thumbnail_upload/{{video_id}}", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
}

fn video_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/videos/{{video_id}}", API_PREFIX),
        get(handlers::video_get::get_video),
    )
}

fn body_limit(max_file_bytes: usize) -> usize {
    max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
}
