//! Reelstore Processing Library
//!
//! The ingest pipeline and the stages it is built from:
//!
//! - `validator`: declared content type allow-list per asset class
//! - `staging`: request-scoped temporary files
//! - `video`: ffmpeg fast-start remux, ffprobe geometry and orientation
//! - `pipeline`: sequencing, admission control and the metadata commit

pub mod error;
pub mod pipeline;
pub mod staging;
pub mod validator;
pub mod video;

pub use error::{ProcessingError, ProcessingResult};
pub use pipeline::{IngestPipeline, UploadRequest, UploadStream};
pub use staging::StagedFile;
pub use validator::{sniff_magic_bytes, validate_media_type};
pub use video::{classify, FfmpegRemuxer, FfprobeProber, Prober, RemuxedFile, Remuxer, StreamGeometry};
