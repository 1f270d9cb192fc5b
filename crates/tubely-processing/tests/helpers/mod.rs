#![allow(dead_code)]

pub mod fixtures;
pub mod runner;
pub mod storage;

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_processing::{AspectRatioProber, FastStartRemuxer, ProcessRunner, VideoIngestor};

use runner::FakeRunner;
use storage::MockStorage;

pub const FFPROBE: &str = "ffprobe";
pub const FFMPEG: &str = "ffmpeg";

/// An ingestor wired to fakes, with its staging directory.
pub struct TestIngest {
    pub staging: TempDir,
    pub runner: Arc<FakeRunner>,
    pub storage: Arc<MockStorage>,
    pub ingestor: Arc<VideoIngestor>,
}

impl TestIngest {
    pub fn new(runner: FakeRunner) -> Self {
        Self::with_storage(runner, MockStorage::new())
    }

    pub fn with_storage(runner: FakeRunner, storage: MockStorage) -> Self {
        let staging = tempfile::tempdir().expect("create staging dir");
        let runner = Arc::new(runner);
        let storage = Arc::new(storage);
        let dyn_runner: Arc<dyn ProcessRunner> = runner.clone();
        let ingestor = VideoIngestor::new(
            storage.clone(),
            AspectRatioProber::new(dyn_runner.clone(), FFPROBE),
            FastStartRemuxer::new(dyn_runner, FFMPEG),
            staging.path(),
        );

        Self {
            staging,
            runner,
            storage,
            ingestor: Arc::new(ingestor),
        }
    }

    /// Files left behind in the staging directory.
    pub fn leftover_files(&self) -> Vec<String> {
        list_files(self.staging.path())
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("read staging dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
