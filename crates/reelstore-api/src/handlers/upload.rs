//! Shared multipart plumbing for the upload endpoints.

use crate::constants::MULTIPART_OVERHEAD_BYTES;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::{header::CONTENT_LENGTH, HeaderMap, StatusCode};
use futures::StreamExt;
use reelstore_core::models::{AssetClass, VideoRecord};
use reelstore_core::AppError;
use reelstore_processing::{ProcessingError, UploadRequest};
use uuid::Uuid;

/// Reject a request whose declared `Content-Length` already exceeds the limit,
/// before any of the body is read.
pub(crate) fn reject_oversized(headers: &HeaderMap, max_file_bytes: usize) -> Result<(), HttpAppError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if let Some(len) = declared {
        let limit = (max_file_bytes + MULTIPART_OVERHEAD_BYTES) as u64;
        if len > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large: request body is {} bytes (max {} bytes)",
                len, max_file_bytes
            ))
            .into());
        }
    }
    Ok(())
}

fn stream_error(max_file_bytes: usize) -> impl Fn(MultipartError) -> ProcessingError {
    move |err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ProcessingError::PayloadTooLarge {
                max: max_file_bytes as u64,
            }
        } else {
            ProcessingError::StorageWrite(format!("Upload stream interrupted: {}", err.body_text()))
        }
    }
}

/// Find the form field for `asset` and run it through the ingest pipeline.
///
/// Other fields are skipped. The file part is streamed, never buffered here.
pub(crate) async fn ingest_multipart(
    state: &AppState,
    mut multipart: Multipart,
    asset: AssetClass,
    video_id: Uuid,
    principal: Uuid,
    max_file_bytes: usize,
) -> Result<VideoRecord, HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(asset.form_field()) {
            continue;
        }

        // A missing type is rejected by the validator, after the ownership check.
        let content_type = field.content_type().map(str::to_string).unwrap_or_default();

        let request = UploadRequest {
            asset,
            content_type,
            video_id,
            principal,
            body: field.map(|chunk| chunk.map_err(stream_error(max_file_bytes))).boxed(),
        };

        return Ok(state.pipeline.ingest(request).await?);
    }

    Err(AppError::InvalidInput(format!(
        "Missing multipart field `{}`",
        asset.form_field()
    ))
    .into())
}
