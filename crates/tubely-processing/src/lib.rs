//! Tubely Processing Library
//!
//! The video ingestion pipeline: stage uploaded bytes locally, classify the
//! frame shape with ffprobe, remux for fast start with ffmpeg, upload the
//! result under a classified key and remove every local artifact.

pub mod ingest;
pub mod process;
pub mod upload;
pub mod video;

// Re-export commonly used types
pub use ingest::{IngestError, IngestFailureCause, VideoIngestor};
pub use process::{ProcessError, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use upload::{UploadValidator, ValidationError, VideoRepository, VideoUpload, VideoUploadService};
pub use video::{AspectRatioProber, FastStartRemuxer, ProbeError, RemuxError};
