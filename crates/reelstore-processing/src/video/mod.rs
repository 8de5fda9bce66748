//! Video processing: fast-start remux, stream probing and orientation.
//!
//! Both external tools sit behind narrow traits so the pipeline can run
//! against deterministic fakes in tests.

pub mod orientation;
pub mod probe;
pub mod remux;

pub use orientation::classify;
pub use probe::{FfprobeProber, Prober, StreamGeometry};
pub use remux::{output_path_for, FfmpegRemuxer, RemuxedFile, Remuxer};
