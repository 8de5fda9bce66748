use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = if state.config.database_url.is_some() {
        "postgres"
    } else {
        "in-memory"
    };

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            storage: state.video_storage.backend_type().to_string(),
            database: database.to_string(),
        }),
    )
}
