//! Video inspection and repackaging via ffprobe / ffmpeg.

pub mod prober;
pub mod remuxer;

pub use prober::{AspectRatioProber, ProbeError};
pub use remuxer::{processed_output_path, FastStartRemuxer, RemuxError};
