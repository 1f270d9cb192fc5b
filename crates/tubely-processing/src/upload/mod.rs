//! Upload intake: validation, ownership checks and record updates around
//! [`crate::ingest::VideoIngestor`].

pub mod service;
pub mod validator;

pub use service::{VideoRepository, VideoUpload, VideoUploadService};
pub use validator::{UploadValidator, ValidationError};
