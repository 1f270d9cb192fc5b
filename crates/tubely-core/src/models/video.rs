use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video record owned by a user. The ingestion pipeline only ever replaces
/// `video_url` and bumps `updated_at`; every other field passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn is_owned_by(&self, owner: &OwnerContext) -> bool {
        self.owner_id == owner.user_id
    }

    /// Return a copy pointing at `url`, stamped with `now`.
    pub fn with_video_url(&self, url: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            video_url: Some(url.into()),
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Authenticated identity of the uploader, resolved upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerContext {
    pub user_id: Uuid,
}

impl OwnerContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
