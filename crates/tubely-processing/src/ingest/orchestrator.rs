//! Ingestion orchestration: stage → probe → remux → upload → cleanup.

use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::{Config, OwnerContext};
use tubely_storage::{video_storage_key, RandomId, Storage};

use super::error::IngestError;
use super::staging::{staging_path, write_staged, LocalArtifacts};
use crate::process::{ProcessRunner, TokioProcessRunner};
use crate::video::{processed_output_path, AspectRatioProber, FastStartRemuxer};

/// Turns raw uploaded bytes into a fast-start MP4 in object storage.
///
/// Every call uses fresh local paths derived from a new [`RandomId`], so
/// concurrent ingestions never share files. Local artifacts are removed
/// exactly once on every outcome, including cancellation of the returned
/// future.
pub struct VideoIngestor {
    storage: Arc<dyn Storage>,
    prober: AspectRatioProber,
    remuxer: FastStartRemuxer,
    staging_dir: PathBuf,
}

impl VideoIngestor {
    pub fn new(
        storage: Arc<dyn Storage>,
        prober: AspectRatioProber,
        remuxer: FastStartRemuxer,
        staging_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            prober,
            remuxer,
            staging_dir: staging_dir.into(),
        }
    }

    /// Build an ingestor that runs both tools through `runner`.
    pub fn with_runner(
        storage: Arc<dyn Storage>,
        runner: Arc<dyn ProcessRunner>,
        config: &Config,
    ) -> Self {
        Self::new(
            storage,
            AspectRatioProber::new(runner.clone(), config.ffprobe_path()),
            FastStartRemuxer::new(runner, config.ffmpeg_path()),
            config.staging_dir(),
        )
    }

    /// Build an ingestor that spawns real tools, bounded by the configured timeout.
    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        let runner: Arc<dyn ProcessRunner> =
            Arc::new(TokioProcessRunner::new(config.tool_timeout()));
        Self::with_runner(storage, runner, config)
    }

    /// Ingest one upload and return the public URL of the stored object.
    ///
    /// The object is written under `videos/<classification>/<hex id>.mp4`
    /// with content type `video/mp4`. Nothing is written to storage unless
    /// probing and remuxing both succeed.
    #[tracing::instrument(skip_all, fields(
        user_id = %owner.user_id,
        size_bytes = raw_bytes.len()
    ))]
    pub async fn ingest(
        &self,
        raw_bytes: &[u8],
        owner: &OwnerContext,
    ) -> Result<String, IngestError> {
        let start = Instant::now();
        let id = RandomId::generate();
        let mut artifacts = LocalArtifacts::new();

        let result = self.run_pipeline(&id, raw_bytes, &mut artifacts).await;
        artifacts.cleanup().await;

        match &result {
            Ok(url) => tracing::info!(
                url = %url,
                duration_ms = start.elapsed().as_millis(),
                "Video ingested"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                duration_ms = start.elapsed().as_millis(),
                "Video ingestion failed"
            ),
        }

        result
    }

    async fn run_pipeline(
        &self,
        id: &RandomId,
        raw_bytes: &[u8],
        artifacts: &mut LocalArtifacts,
    ) -> Result<String, IngestError> {
        let staged = staging_path(&self.staging_dir, id);
        artifacts.track(&staged);
        write_staged(&staged, raw_bytes)
            .await
            .map_err(IngestError::StagingFailed)?;
        tracing::debug!(path = %staged.display(), "Upload staged");

        let classification = self.prober.probe(&staged).await?;
        tracing::debug!(classification = %classification, "Aspect ratio classified");

        artifacts.track(processed_output_path(&staged));
        let processed = self.remuxer.remux(&staged).await?;

        let data = tokio::fs::read(&processed).await.map_err(|e| {
            IngestError::upload(format!(
                "failed to read processed file {}: {}",
                processed.display(),
                e
            ))
        })?;

        let key = video_storage_key(id, classification);
        self.storage
            .put_object(&key, Bytes::from(data), VIDEO_CONTENT_TYPE)
            .await?;

        Ok(self.storage.url_for(&key))
    }
}
