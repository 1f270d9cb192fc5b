use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tubely_core::{AppError, OwnerContext, VideoRecord};
use uuid::Uuid;

use super::validator::UploadValidator;
use crate::ingest::VideoIngestor;

/// Persistence for video records.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, video_id: Uuid) -> anyhow::Result<Option<VideoRecord>>;

    async fn update_video(&self, video: &VideoRecord) -> anyhow::Result<()>;
}

/// An uploaded video body with its declared content type.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub data: Bytes,
    pub content_type: String,
}

impl VideoUpload {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }
}

/// Attaches an ingested video to an existing record owned by the caller.
pub struct VideoUploadService {
    repository: Arc<dyn VideoRepository>,
    ingestor: Arc<VideoIngestor>,
    validator: UploadValidator,
}

impl VideoUploadService {
    pub fn new(
        repository: Arc<dyn VideoRepository>,
        ingestor: Arc<VideoIngestor>,
        validator: UploadValidator,
    ) -> Self {
        Self {
            repository,
            ingestor,
            validator,
        }
    }

    /// Validate, ingest and store the upload, then point the record's
    /// `video_url` at it. The record is left untouched on any failure.
    #[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %owner.user_id))]
    pub async fn upload_video(
        &self,
        video_id: Uuid,
        owner: &OwnerContext,
        upload: VideoUpload,
    ) -> Result<VideoRecord, AppError> {
        self.validator
            .validate_all(&upload.content_type, upload.data.len())?;

        let video = self
            .repository
            .get_video(video_id)
            .await?
            .filter(|video| video.is_owned_by(owner))
            .ok_or_else(|| {
                tracing::debug!("Video missing or owned by another user");
                AppError::Forbidden("Couldn't find video for this user".to_string())
            })?;

        let url = self.ingestor.ingest(&upload.data, owner).await?;

        let updated = video.with_video_url(url, Utc::now());
        self.repository.update_video(&updated).await?;

        tracing::info!(video_url = ?updated.video_url, "Video record updated");
        Ok(updated)
    }
}
