//! Configuration module
//!
//! Settings for the ingestion pipeline: storage backend selection, external
//! tool locations, staging directory and upload limits. Values come from the
//! process environment, with `.env` loaded first when present.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_MAX_VIDEO_UPLOAD_SIZE_BYTES;
use crate::storage_types::StorageBackend;

const TOOL_TIMEOUT_SECS: u64 = 600;
const FFPROBE_PATH: &str = "ffprobe";
const FFMPEG_PATH: &str = "ffmpeg";

/// Ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub s3_cf_distribution: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // External tools
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    /// `None` disables the per-invocation timeout.
    pub tool_timeout: Option<Duration>,
    // Staging
    pub staging_dir: PathBuf,
    pub max_video_upload_size_bytes: usize,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        const MAX_VIDEO_UPLOAD_SIZE_MB: usize = DEFAULT_MAX_VIDEO_UPLOAD_SIZE_BYTES >> 20;

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let tool_timeout_secs = match lookup("TOOL_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("TOOL_TIMEOUT_SECS must be a valid number"))?,
            None => TOOL_TIMEOUT_SECS,
        };

        let max_video_upload_size_mb = match lookup("MAX_VIDEO_UPLOAD_SIZE_MB") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| {
                anyhow::anyhow!("MAX_VIDEO_UPLOAD_SIZE_MB must be a valid number")
            })?,
            None => MAX_VIDEO_UPLOAD_SIZE_MB,
        };
        let max_video_upload_size_bytes = max_video_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_VIDEO_UPLOAD_SIZE_MB is too large"))?;

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(IngestConfig {
            environment,
            storage_backend,
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION").or_else(|| non_empty("AWS_REGION")),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            s3_cf_distribution: non_empty("S3_CF_DISTRO"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            ffprobe_path: lookup("FFPROBE_PATH").unwrap_or_else(|| FFPROBE_PATH.to_string()),
            ffmpeg_path: lookup("FFMPEG_PATH").unwrap_or_else(|| FFMPEG_PATH.to_string()),
            tool_timeout: (tool_timeout_secs > 0).then(|| Duration::from_secs(tool_timeout_secs)),
            staging_dir: non_empty("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_video_upload_size_bytes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when STORAGE_BACKEND is s3"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND is s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND is local"
                    ));
                }
            }
        }

        if self.ffprobe_path.trim().is_empty() {
            return Err(anyhow::anyhow!("FFPROBE_PATH cannot be empty"));
        }
        if self.ffmpeg_path.trim().is_empty() {
            return Err(anyhow::anyhow!("FFMPEG_PATH cannot be empty"));
        }
        if self.max_video_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_UPLOAD_SIZE_MB must be greater than zero"
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_ingest().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn s3_cf_distribution(&self) -> Option<&str> {
        self.as_ingest().s3_cf_distribution.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.as_ingest().tool_timeout
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.as_ingest().staging_dir
    }

    pub fn max_video_upload_size_bytes(&self) -> usize {
        self.as_ingest().max_video_upload_size_bytes
    }
}
