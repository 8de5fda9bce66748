//! Upload API integration tests.
//!
//! Run with: `cargo test -p reelstore-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{gif_bytes, mp4_bytes, png_bytes};
use helpers::{
    api_path, file_form, setup_production_test_app, setup_test_app, setup_test_app_with_geometry,
};
use reelstore_core::models::VideoRecord;
use std::sync::atomic::Ordering;
use uuid::Uuid;

#[tokio::test]
async fn test_landscape_video_upload_end_to_end() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status_ok();
    let record: VideoRecord = response.json();
    let url = record.video_url.clone().expect("video_url set");
    let key = url
        .strip_prefix(&format!("{}/", helpers::VIDEO_BASE_URL))
        .expect("url under the video store");
    assert!(key.starts_with("landscape/"));
    assert!(key.ends_with(".mp4"));
    // 43 base64url chars for 32 random bytes
    assert_eq!(key.len(), "landscape/".len() + 43 + ".mp4".len());

    assert_eq!(app.stored().await, record);
    assert_eq!(record.thumbnail_url, app.video.thumbnail_url);
    assert_eq!(record.title, app.video.title);

    assert_eq!(app.stored_videos().len(), 1);
    assert_eq!(std::fs::read(&app.stored_videos()[0]).unwrap(), mp4_bytes());
    assert_eq!(app.remux_calls(), 1);
    assert_eq!(app.prober.calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn test_portrait_video_upload() {
    let app = setup_test_app_with_geometry(1080, 1920).await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status_ok();
    let record: VideoRecord = response.json();
    assert!(record.video_url.unwrap().contains("/portrait/"));
}

#[tokio::test]
async fn test_square_video_goes_under_other() {
    let app = setup_test_app_with_geometry(1080, 1080).await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status_ok();
    let record: VideoRecord = response.json();
    assert!(record.video_url.unwrap().contains("/other/"));
}

#[tokio::test]
async fn test_missing_token_is_rejected_without_side_effects() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(app.staged_files(), 0);
    assert!(app.stored_videos().is_empty());
    assert_eq!(app.remux_calls(), 0);
    assert_eq!(app.stored().await, app.video);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = setup_test_app().await;
    let forged = reelstore_api::auth::issue_access_token(
        "some-other-secret-some-other-secret",
        helpers::TEST_ISSUER,
        app.owner,
    )
    .unwrap();

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(forged)
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(app.remux_calls(), 0);
    assert!(app.stored_videos().is_empty());
}

#[tokio::test]
async fn test_non_owner_is_rejected() {
    let app = setup_test_app().await;
    let stranger = app.token_for(Uuid::new_v4());

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(stranger)
        .multipart(file_form("thumbnail", "thumb.png", "image/png", png_bytes()))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(app.stored_thumbnails().is_empty());
    assert_eq!(app.stored().await, app.video);
}

#[tokio::test]
async fn test_unknown_video_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", Uuid::new_v4())))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.remux_calls(), 0);
}

#[tokio::test]
async fn test_malformed_video_id_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/video_upload/not-a-uuid"))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn test_gif_thumbnail_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.gif", "image/gif", gif_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.stored_thumbnails().is_empty());
    assert_eq!(app.stored().await.thumbnail_url, None);
}

#[tokio::test]
async fn test_error_details_shown_outside_production() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.gif", "image/gif", gif_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_MEDIA_TYPE");
    assert_eq!(body["error_type"], "InvalidMediaType");
    assert!(body["details"].as_str().unwrap().contains("image/gif"));
}

#[tokio::test]
async fn test_production_config_hides_error_details() {
    let app = setup_production_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.gif", "image/gif", gif_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_MEDIA_TYPE");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());

    let response = app.client().get(&api_path("/videos/not-a-uuid")).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_non_mp4_video_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mov", "video/quicktime", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.staged_files(), 0);
    assert_eq!(app.remux_calls(), 0);
}

#[tokio::test]
async fn test_missing_form_field_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("file", "clip.mp4", "video/mp4", mp4_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_thumbnail_is_payload_too_large() {
    let app = setup_test_app().await;
    let mut data = png_bytes();
    data.resize(helpers::MAX_THUMBNAIL_BYTES * 4, 0);

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.png", "image/png", data))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.stored_thumbnails().is_empty());
}

#[tokio::test]
async fn test_oversized_video_is_payload_too_large() {
    let app = setup_test_app().await;
    let mut data = mp4_bytes();
    data.resize(helpers::MAX_VIDEO_BYTES + 1, 0);

    let response = app
        .client()
        .post(&api_path(&format!("/video_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("video", "clip.mp4", "video/mp4", data))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.staged_files(), 0);
    assert_eq!(app.remux_calls(), 0);
    assert_eq!(app.stored().await, app.video);
}

#[tokio::test]
async fn test_thumbnail_upload_end_to_end() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.png", "image/png", png_bytes()))
        .await;

    response.assert_status_ok();
    let record: VideoRecord = response.json();
    let url = record.thumbnail_url.clone().expect("thumbnail_url set");
    let key = url
        .strip_prefix(&format!("{}/", helpers::ASSETS_BASE_URL))
        .expect("url under the assets base");
    assert!(!key.contains('/'));
    assert!(key.ends_with(".png"));
    assert_eq!(record.video_url, None);
    assert_eq!(app.stored().await, record);

    let thumbnails = app.stored_thumbnails();
    assert_eq!(thumbnails.len(), 1);
    assert_eq!(std::fs::read(&thumbnails[0]).unwrap(), png_bytes());
    assert_eq!(app.remux_calls(), 0);
}

#[tokio::test]
async fn test_thumbnail_is_served_from_assets() {
    let app = setup_test_app().await;

    let record: VideoRecord = app
        .client()
        .post(&api_path(&format!("/thumbnail_upload/{}", app.video.id)))
        .authorization_bearer(app.owner_token())
        .multipart(file_form("thumbnail", "thumb.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .await
        .json();

    let url = record.thumbnail_url.unwrap();
    let path = url.strip_prefix("http://localhost:8091").unwrap();
    assert!(path.ends_with(".jpeg"));

    let response = app.client().get(path).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().to_vec(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn test_get_video_is_owner_only() {
    let app = setup_test_app().await;
    let path = api_path(&format!("/videos/{}", app.video.id));

    let response = app
        .client()
        .get(&path)
        .authorization_bearer(app.owner_token())
        .await;
    response.assert_status_ok();
    let record: VideoRecord = response.json();
    assert_eq!(record, app.video);

    let response = app
        .client()
        .get(&path)
        .authorization_bearer(app.token_for(Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    app.client().get(&path).await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_openapi_are_public() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "in-memory");

    let response = app.client().get("/api/openapi.json").await;
    response.assert_status_ok();
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"].get("/api/video_upload/{video_id}").is_some());
    assert!(spec["components"]["securitySchemes"]
        .get("bearer_auth")
        .is_some());
}
