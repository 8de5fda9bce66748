//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` (or
//! a type converting into it) renders through the same status/body/logging path.
//! Bodies carry `details` unless the error is sensitive; [`hide_error_details`]
//! strips them when the configured environment is production.

use axum::{
    extract::{multipart::MultipartError, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use reelstore_core::{AppError, Config, ErrorMetadata, LogLevel};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper so `IntoResponse` can be implemented for the core error type.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<uuid::Error> for HttpAppError {
    fn from(err: uuid::Error) -> Self {
        HttpAppError(err.into())
    }
}

/// Failures while walking the multipart form (before any file bytes are read).
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            HttpAppError(AppError::PayloadTooLarge(err.body_text()))
        } else {
            HttpAppError(AppError::InvalidInput(format!(
                "Couldn't parse form: {}",
                err.body_text()
            )))
        }
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Client-safe rendering of an error, kept on the response so it can be
/// swapped in for the detailed body.
#[derive(Clone)]
struct RedactedError(ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let redacted = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        // Transcoder stderr and storage errors stay in the logs.
        if app_error.is_sensitive() {
            return (status, Json(redacted)).into_response();
        }

        let detailed = ErrorResponse {
            details: Some(app_error.detailed_message()),
            error_type: Some(app_error.error_type().to_string()),
            ..redacted.clone()
        };

        let mut response = (status, Json(detailed)).into_response();
        response.extensions_mut().insert(RedactedError(redacted));
        response
    }
}

/// Replace detailed error bodies with their redacted form in production.
pub async fn hide_error_details(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !config.is_production() {
        return response;
    }

    match response.extensions().get::<RedactedError>().cloned() {
        Some(RedactedError(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}
