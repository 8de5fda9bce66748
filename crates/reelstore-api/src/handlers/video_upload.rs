use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::upload::{ingest_multipart, reject_oversized};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use reelstore_core::models::{AssetClass, VideoRecord};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `video` carrying a video/mp4 file"),
    responses(
        (status = 200, description = "Video stored and record updated", body = VideoRecord),
        (status = 400, description = "Invalid ID or media type", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Transcode, storage or metadata failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, headers, multipart),
    fields(user_id = %user.user_id, video_id = %video_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)?;
    let max_bytes = state.config.max_video_size_bytes;
    reject_oversized(&headers, max_bytes)?;

    let record = ingest_multipart(
        &state,
        multipart,
        AssetClass::Video,
        video_id,
        user.user_id,
        max_bytes,
    )
    .await?;

    Ok(Json(record))
}
