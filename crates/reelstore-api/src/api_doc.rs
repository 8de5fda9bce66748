//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers;
use reelstore_core::models::VideoRecord;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelstore API",
        version = "0.1.0",
        description = "Video and thumbnail ingest. Uploaded videos are remuxed for fast start, partitioned by orientation and stored in S3; thumbnails are stored on local disk."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::health::health_check,
    ),
    components(schemas(VideoRecord, ErrorResponse, handlers::health::HealthCheckResponse)),
    modifiers(&BearerAuth),
    tags(
        (name = "uploads", description = "Thumbnail and video upload"),
        (name = "videos", description = "Video records"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
