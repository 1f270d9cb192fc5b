//! Video ingestion: staging → probing → remuxing → upload → cleanup.

pub mod error;
pub mod orchestrator;
pub mod staging;

pub use error::{IngestError, IngestFailureCause};
pub use orchestrator::VideoIngestor;
pub use staging::{remove_artifact, staging_path, LocalArtifacts};
