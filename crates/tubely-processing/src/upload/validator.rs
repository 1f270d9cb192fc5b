use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidContentType { .. } => {
                AppError::BadRequest("Invalid file type".to_string())
            }
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::EmptyFile => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Checks a video upload before any bytes touch the disk.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validator accepting only `video/mp4` up to `max_file_size` bytes.
    pub fn mp4(max_file_size: usize) -> Self {
        Self::new(max_file_size, vec![VIDEO_CONTENT_TYPE.to_string()])
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Media type parameters such as `; codecs=...` are ignored.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if !self.allowed_content_types.iter().any(|ct| ct == &essence) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Content type first, then size.
    pub fn validate_all(&self, content_type: &str, file_size: usize) -> Result<(), ValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(file_size)?;
        Ok(())
    }
}
