use crate::error::{ProcessingError, ProcessingResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Frame size of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGeometry {
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, path: &Path) -> ProcessingResult<StreamGeometry>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Pick the first video stream carrying a non-zero width and height out of
/// `ffprobe -print_format json -show_streams` output.
pub fn parse_probe_output(stdout: &[u8]) -> ProcessingResult<StreamGeometry> {
    let output: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| {
        ProcessingError::Classification(format!("Failed to parse ffprobe output: {}", e))
    })?;

    output
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .find_map(|s| match (s.width, s.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Some(StreamGeometry { width, height })
            }
            _ => None,
        })
        .ok_or_else(|| {
            ProcessingError::Classification("No video stream with dimensions found".to_string())
        })
}

pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> ProcessingResult<StreamGeometry> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ProcessingError::Classification(format!("Failed to execute ffprobe: {}", e))
            })?;

        if !output.status.success() {
            return Err(ProcessingError::Classification(format!(
                "ffprobe failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}
