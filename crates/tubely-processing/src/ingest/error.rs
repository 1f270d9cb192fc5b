use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::AppError;
use tubely_storage::StorageError;

use crate::video::{ProbeError, RemuxError};

/// Which pipeline step made an ingestion fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestFailureCause {
    ProbeFailed,
    DimensionsUnavailable,
    RemuxFailed,
    UploadFailed,
}

impl IngestFailureCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestFailureCause::ProbeFailed => "PROBE_FAILED",
            IngestFailureCause::DimensionsUnavailable => "DIMENSIONS_UNAVAILABLE",
            IngestFailureCause::RemuxFailed => "REMUX_FAILED",
            IngestFailureCause::UploadFailed => "UPLOAD_FAILED",
        }
    }
}

impl Display for IngestFailureCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The raw bytes could not be written to local staging.
    #[error("failed to stage upload: {0}")]
    StagingFailed(#[source] std::io::Error),

    /// A step after staging failed. `detail` carries tool stderr or the
    /// backend message.
    #[error("video ingestion failed ({cause}): {detail}")]
    IngestionFailed {
        cause: IngestFailureCause,
        detail: String,
    },
}

impl IngestError {
    pub fn failure_cause(&self) -> Option<IngestFailureCause> {
        match self {
            IngestError::StagingFailed(_) => None,
            IngestError::IngestionFailed { cause, .. } => Some(*cause),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            IngestError::StagingFailed(_) => None,
            IngestError::IngestionFailed { detail, .. } => Some(detail),
        }
    }

    pub(crate) fn upload(detail: impl Into<String>) -> Self {
        IngestError::IngestionFailed {
            cause: IngestFailureCause::UploadFailed,
            detail: detail.into(),
        }
    }
}

impl From<ProbeError> for IngestError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::ProbeFailed { detail } => IngestError::IngestionFailed {
                cause: IngestFailureCause::ProbeFailed,
                detail,
            },
            ProbeError::DimensionsUnavailable { detail } => IngestError::IngestionFailed {
                cause: IngestFailureCause::DimensionsUnavailable,
                detail,
            },
        }
    }
}

impl From<RemuxError> for IngestError {
    fn from(err: RemuxError) -> Self {
        match err {
            RemuxError::RemuxFailed { detail } => IngestError::IngestionFailed {
                cause: IngestFailureCause::RemuxFailed,
                detail,
            },
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        IngestError::upload(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::StagingFailed(e) => {
                AppError::Internal(format!("Failed to stage upload: {}", e))
            }
            IngestError::IngestionFailed {
                cause: IngestFailureCause::UploadFailed,
                detail,
            } => AppError::Storage(detail),
            IngestError::IngestionFailed { cause, detail } => {
                AppError::MediaProcessing(format!("{}: {}", cause, detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_probe_error_mapping() {
        let err = IngestError::from(ProbeError::ProbeFailed {
            detail: "invalid data".to_string(),
        });
        assert_eq!(err.failure_cause(), Some(IngestFailureCause::ProbeFailed));
        assert_eq!(err.detail(), Some("invalid data"));

        let err = IngestError::from(ProbeError::DimensionsUnavailable {
            detail: "no video stream found".to_string(),
        });
        assert_eq!(
            err.failure_cause(),
            Some(IngestFailureCause::DimensionsUnavailable)
        );
    }

    #[test]
    fn test_storage_error_maps_to_upload_failed() {
        let err = IngestError::from(StorageError::UploadFailed("network error".to_string()));
        assert_eq!(err.failure_cause(), Some(IngestFailureCause::UploadFailed));
        assert!(err.detail().unwrap().contains("network error"));
    }

    #[test]
    fn test_app_error_translation() {
        let err: AppError = IngestError::IngestionFailed {
            cause: IngestFailureCause::RemuxFailed,
            detail: "moov atom not found".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "MEDIA_PROCESSING_ERROR");
        assert!(err.to_string().contains("REMUX_FAILED"));

        let err: AppError = IngestError::upload("timeout").into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");

        let err: AppError =
            IngestError::StagingFailed(std::io::Error::other("disk full")).into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_display() {
        let err = IngestError::IngestionFailed {
            cause: IngestFailureCause::ProbeFailed,
            detail: "invalid data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "video ingestion failed (PROBE_FAILED): invalid data"
        );
    }
}
