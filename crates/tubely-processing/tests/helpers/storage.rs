//! In-memory stand-ins for object storage and the record store.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tubely_core::VideoRecord;
use tubely_processing::VideoRepository;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Object storage that keeps uploads in memory
pub struct MockStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let storage = Self::new();
        storage.fail_uploads.store(true, Ordering::SeqCst);
        storage
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated network error".to_string(),
            ));
        }

        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn url_for(&self, storage_key: &str) -> String {
        format!("https://tubely-test.s3.us-east-2.amazonaws.com/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Record store backed by a map
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, VideoRecord>>,
    updates: Mutex<usize>,
}

impl InMemoryVideoRepository {
    pub fn with_video(video: VideoRecord) -> Self {
        let repo = Self::default();
        repo.videos.lock().unwrap().insert(video.id, video);
        repo
    }

    pub fn video(&self, id: Uuid) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, video_id: Uuid) -> anyhow::Result<Option<VideoRecord>> {
        Ok(self.video(video_id))
    }

    async fn update_video(&self, video: &VideoRecord) -> anyhow::Result<()> {
        self.videos.lock().unwrap().insert(video.id, video.clone());
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }
}
