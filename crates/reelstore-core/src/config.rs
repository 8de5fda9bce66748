//! Configuration module
//!
//! `Config` is read once at startup and then shared immutably (behind an `Arc`)
//! with every component. Nothing downstream reads the environment again.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_CONCURRENT_TRANSCODES: usize = 2;
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub database_url: Option<String>,
    // Video object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: PathBuf,
    pub local_storage_base_url: String,
    // Thumbnails are written to disk under the assets root
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    // Processing
    pub upload_temp_dir: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    pub max_concurrent_transcodes: usize,
    pub content_sniffing_enabled: bool,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Unset or blank keys take the default; anything else must parse.
fn env_parse<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e))
}

fn mb_to_bytes(key: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB overflows a byte count", key, mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        let storage_backend = env_or("STORAGE_BACKEND", "s3").parse::<StorageBackend>()?;

        let max_thumbnail_size_mb = env_parse("MAX_THUMBNAIL_SIZE_MB", MAX_THUMBNAIL_SIZE_MB)?;
        let max_video_size_mb = env_parse("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?;

        let config = Config {
            environment,
            server_port: env_parse("SERVER_PORT", SERVER_PORT)?,
            jwt_secret,
            jwt_issuer: env_or("JWT_ISSUER", "reelstore-access"),
            database_url: env_opt("DATABASE_URL"),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: PathBuf::from(env_or("LOCAL_STORAGE_PATH", "./media")),
            local_storage_base_url: env_or(
                "LOCAL_STORAGE_BASE_URL",
                "http://localhost:8091/media",
            ),
            assets_root: PathBuf::from(env_or("ASSETS_ROOT", "./assets")),
            assets_base_url: env_or("ASSETS_BASE_URL", "http://localhost:8091/assets"),
            upload_temp_dir: env_opt("UPLOAD_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            ffmpeg_path: env_or("FFMPEG_PATH", "ffmpeg"),
            ffprobe_path: env_or("FFPROBE_PATH", "ffprobe"),
            max_thumbnail_size_bytes: mb_to_bytes("MAX_THUMBNAIL_SIZE_MB", max_thumbnail_size_mb)?,
            max_video_size_bytes: mb_to_bytes("MAX_VIDEO_SIZE_MB", max_video_size_mb)?,
            max_concurrent_transcodes: env_parse(
                "MAX_CONCURRENT_TRANSCODES",
                MAX_CONCURRENT_TRANSCODES,
            )?,
            content_sniffing_enabled: env_parse("CONTENT_SNIFFING_ENABLED", false)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.max_concurrent_transcodes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_TRANSCODES must be greater than zero"
            ));
        }

        if self.storage_backend == StorageBackend::S3
            && (self.s3_bucket.is_none() || self.s3_region.is_none())
        {
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND=s3 requires S3_BUCKET and S3_REGION (or AWS_REGION)"
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
