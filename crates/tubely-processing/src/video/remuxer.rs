//! Fast-start remuxing with ffmpeg.
//!
//! Streams are copied untouched; only the container is rewritten so the
//! `moov` index precedes the media data.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tubely_core::constants::PROCESSED_SUFFIX;

use crate::process::ProcessRunner;

#[derive(Debug, thiserror::Error)]
pub enum RemuxError {
    #[error("ffmpeg remux failed: {detail}")]
    RemuxFailed { detail: String },
}

/// Output path for a remux of `input`: the input path with a fixed suffix.
pub fn processed_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(PROCESSED_SUFFIX);
    PathBuf::from(name)
}

pub struct FastStartRemuxer {
    runner: Arc<dyn ProcessRunner>,
    ffmpeg_path: String,
}

impl FastStartRemuxer {
    pub fn new(runner: Arc<dyn ProcessRunner>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-movflags".to_string(),
            "faststart".to_string(),
            "-map_metadata".to_string(),
            "0".to_string(),
            "-codec".to_string(),
            "copy".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Remux `input` into a sibling file and return its path.
    ///
    /// On failure a partial output file may remain; removing it is the
    /// caller's job.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let output_path = processed_output_path(input);

        let output = self
            .runner
            .run(&self.ffmpeg_path, &Self::args(input, &output_path))
            .await
            .map_err(|e| RemuxError::RemuxFailed {
                detail: e.to_string(),
            })?;

        if !output.success() {
            tracing::error!(
                exit_code = ?output.exit_code,
                stderr = %output.stderr,
                "FFmpeg remux failed"
            );
            return Err(RemuxError::RemuxFailed {
                detail: output.stderr,
            });
        }

        tracing::info!(output = %output_path.display(), "Fast-start remux completed");
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_output_path() {
        let out = processed_output_path(Path::new("/tmp/staging/abcd.mp4"));
        assert_eq!(out, PathBuf::from("/tmp/staging/abcd.mp4.processed.mp4"));
    }

    #[test]
    fn test_args_copy_streams_and_move_index() {
        let args = FastStartRemuxer::args(Path::new("in.mp4"), Path::new("in.mp4.processed.mp4"));
        let joined = args.join(" ");
        assert!(joined.contains("-i in.mp4"));
        assert!(joined.contains("-movflags faststart"));
        assert!(joined.contains("-map_metadata 0"));
        assert!(joined.contains("-codec copy"));
        assert!(joined.contains("-f mp4"));
        assert_eq!(args.last().map(String::as_str), Some("in.mp4.processed.mp4"));
    }
}
