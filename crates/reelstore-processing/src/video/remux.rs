use crate::error::{ProcessingError, ProcessingResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempPath;
use tokio::process::Command;

/// Output of a remux. The file is deleted when this value is dropped.
pub struct RemuxedFile {
    path: TempPath,
}

impl RemuxedFile {
    /// Take ownership of `path`; it is removed on drop whether or not it exists yet.
    pub fn from_path(path: PathBuf) -> Self {
        Self {
            path: TempPath::from_path(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<input>.processing.mp4`
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".processing.mp4");
    PathBuf::from(name)
}

/// Rewrites a container so its index precedes the media data.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(&self, input: &Path) -> ProcessingResult<RemuxedFile>;
}

/// Stream-copy remux through the ffmpeg binary. Never re-encodes.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> ProcessingResult<RemuxedFile> {
        let start = std::time::Instant::now();
        // Guard first so a partial output is cleaned up on failure.
        let output = RemuxedFile::from_path(output_path_for(input));

        let result = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart"])
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::Transcode(format!("Failed to execute ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!(
                status = %result.status,
                stderr = %stderr,
                "ffmpeg remux failed"
            );
            return Err(ProcessingError::Transcode(format!(
                "ffmpeg failed ({}): {}",
                result.status, stderr
            )));
        }

        if !tokio::fs::try_exists(output.path()).await.unwrap_or(false) {
            return Err(ProcessingError::Transcode(format!(
                "ffmpeg exited successfully but produced no output at {}",
                output.path().display()
            )));
        }

        tracing::info!(
            output = %output.path().display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux completed"
        );

        Ok(output)
    }
}
