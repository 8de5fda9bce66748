//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs against the in-memory record store, local storage in a temp
//! dir and fake ffmpeg/ffprobe stages, so no external services are needed.

pub mod fixtures;

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use reelstore_api::auth::{issue_access_token, JwtService};
use reelstore_api::constants;
use reelstore_api::setup::routes;
use reelstore_api::state::AppState;
use reelstore_core::models::VideoRecord;
use reelstore_core::{Config, StorageBackend};
use reelstore_db::InMemoryVideoRepository;
use reelstore_processing::video::output_path_for;
use reelstore_processing::{
    IngestPipeline, ProcessingResult, Prober, RemuxedFile, Remuxer, StreamGeometry,
};
use reelstore_storage::LocalStorage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";
pub const TEST_ISSUER: &str = "reelstore-access";
pub const VIDEO_BASE_URL: &str = "https://reels.s3.us-east-1.amazonaws.com";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";
pub const MAX_THUMBNAIL_BYTES: usize = 1024;
pub const MAX_VIDEO_BYTES: usize = 8 * 1024;

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Copies the input and counts invocations.
#[derive(Default)]
pub struct RecordingRemuxer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Remuxer for RecordingRemuxer {
    async fn remux(&self, input: &Path) -> ProcessingResult<RemuxedFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = RemuxedFile::from_path(output_path_for(input));
        tokio::fs::copy(input, output.path())
            .await
            .expect("copy staged file");
        Ok(output)
    }
}

/// Reports fixed dimensions for every file.
pub struct FixedProber {
    pub calls: AtomicUsize,
    geometry: StreamGeometry,
}

#[async_trait]
impl Prober for FixedProber {
    async fn probe(&self, _path: &Path) -> ProcessingResult<StreamGeometry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.geometry)
    }
}

/// Test application: server plus handles on everything behind it.
pub struct TestApp {
    pub server: TestServer,
    pub repo: InMemoryVideoRepository,
    pub remuxer: Arc<RecordingRemuxer>,
    pub prober: Arc<FixedProber>,
    pub owner: Uuid,
    pub video: VideoRecord,
    pub _temp_dir: TempDir,
    staging_dir: PathBuf,
    videos_dir: PathBuf,
    assets_dir: PathBuf,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        issue_access_token(TEST_JWT_SECRET, TEST_ISSUER, user_id).expect("issue token")
    }

    pub fn owner_token(&self) -> String {
        self.token_for(self.owner)
    }

    pub async fn stored(&self) -> VideoRecord {
        use reelstore_db::VideoRepository;
        self.repo
            .get_video(self.video.id)
            .await
            .expect("repository read")
            .expect("record present")
    }

    /// Files left in the staging directory.
    pub fn staged_files(&self) -> usize {
        count_files(&self.staging_dir)
    }

    /// Objects written to the video store, recursively.
    pub fn stored_videos(&self) -> Vec<PathBuf> {
        walk(&self.videos_dir)
    }

    pub fn stored_thumbnails(&self) -> Vec<PathBuf> {
        walk(&self.assets_dir)
    }

    pub fn remux_calls(&self) -> usize {
        self.remuxer.calls.load(Ordering::SeqCst)
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|e| e.count()).unwrap_or(0)
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files
}

fn test_config(root: &Path, environment: &str) -> Config {
    Config {
        environment: environment.to_string(),
        server_port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_issuer: TEST_ISSUER.to_string(),
        database_url: None,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: root.join("videos"),
        local_storage_base_url: VIDEO_BASE_URL.to_string(),
        assets_root: root.join("assets"),
        assets_base_url: ASSETS_BASE_URL.to_string(),
        upload_temp_dir: root.join("staging"),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_thumbnail_size_bytes: MAX_THUMBNAIL_BYTES,
        max_video_size_bytes: MAX_VIDEO_BYTES,
        max_concurrent_transcodes: 2,
        content_sniffing_enabled: false,
    }
}

/// Setup a test app whose prober reports a 1920x1080 stream.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_geometry(1920, 1080).await
}

pub async fn setup_test_app_with_geometry(width: u32, height: u32) -> TestApp {
    build_test_app(width, height, "test").await
}

/// Same app with `environment = "production"`.
pub async fn setup_production_test_app() -> TestApp {
    build_test_app(1920, 1080, "production").await
}

async fn build_test_app(width: u32, height: u32, environment: &str) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = Arc::new(test_config(temp_dir.path(), environment));

    let video_storage = Arc::new(
        LocalStorage::new(
            config.local_storage_path.clone(),
            config.local_storage_base_url.clone(),
        )
        .await
        .expect("Failed to create video storage"),
    );
    let thumbnail_storage = Arc::new(
        LocalStorage::new(config.assets_root.clone(), config.assets_base_url.clone())
            .await
            .expect("Failed to create thumbnail storage"),
    );

    let repo = InMemoryVideoRepository::new();
    let owner = Uuid::new_v4();
    let video = VideoRecord::draft(owner, "clip", "integration test clip");
    repo.insert(video.clone()).await;

    let remuxer = Arc::new(RecordingRemuxer::default());
    let prober = Arc::new(FixedProber {
        calls: AtomicUsize::new(0),
        geometry: StreamGeometry { width, height },
    });

    let pipeline = IngestPipeline::new(
        config.clone(),
        Arc::new(repo.clone()),
        video_storage.clone(),
        thumbnail_storage,
        remuxer.clone(),
        prober.clone(),
    );

    let state = Arc::new(AppState {
        jwt: JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()),
        config: config.clone(),
        pipeline: Arc::new(pipeline),
        video_storage,
    });

    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        repo,
        remuxer,
        prober,
        owner,
        video,
        staging_dir: config.upload_temp_dir.clone(),
        videos_dir: config.local_storage_path.clone(),
        assets_dir: config.assets_root.clone(),
        _temp_dir: temp_dir,
    }
}

/// Single-file multipart form.
pub fn file_form(field: &str, file_name: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        field.to_string(),
        Part::bytes(data).file_name(file_name).mime_type(mime),
    )
}
