//! Constants shared across the ingestion pipeline.

/// The only media type accepted for video uploads; also used as the
/// content type of the uploaded object.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Default upper bound for a single video upload (1 GiB).
pub const DEFAULT_MAX_VIDEO_UPLOAD_SIZE_BYTES: usize = 1 << 30;

/// Target ratio for landscape videos.
pub const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;

/// Target ratio for portrait videos.
pub const PORTRAIT_RATIO: f64 = 9.0 / 16.0;

/// Absolute tolerance applied when matching a ratio against a target.
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.05;

/// Number of random bytes behind every storage key and staging file name.
pub const RANDOM_ID_LEN: usize = 32;

/// Suffix appended to a staged file path to name the remuxed output.
pub const PROCESSED_SUFFIX: &str = ".processed.mp4";
