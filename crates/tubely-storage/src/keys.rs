//! Storage key generation.
//!
//! Key format: `videos/{classification}/{random_id}.mp4`. Uniqueness relies
//! entirely on the 32 random bytes behind `random_id`.

use rand::RngCore;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::constants::RANDOM_ID_LEN;
use tubely_core::AspectClassification;

use crate::traits::{StorageError, StorageResult};

/// Cryptographically random identifier shared by a staged file and its object key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RandomId([u8; RANDOM_ID_LEN]);

impl RandomId {
    /// Draw a fresh identifier from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; RANDOM_ID_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; RANDOM_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Display for RandomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for RandomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "RandomId({})", self.to_hex())
    }
}

/// Build the object key for a processed video.
pub fn video_storage_key(id: &RandomId, classification: AspectClassification) -> String {
    format!("videos/{}/{}.mp4", classification, id.to_hex())
}

/// Reject keys that could escape a storage root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
