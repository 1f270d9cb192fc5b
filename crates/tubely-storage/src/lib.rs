//! Tubely Storage Library
//!
//! Object storage abstraction and its S3 and local filesystem implementations.
//!
//! # Storage key format
//!
//! Video keys are classified by aspect ratio: `videos/{classification}/{random_id}.mp4`,
//! where `random_id` is 32 random bytes, hex encoded. Keys must not contain `..`
//! or a leading `/`. Key generation lives in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{video_storage_key, RandomId};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
