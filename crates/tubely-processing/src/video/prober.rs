//! Aspect ratio probing with ffprobe.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tubely_core::AspectClassification;

use crate::process::ProcessRunner;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("ffprobe failed: {detail}")]
    ProbeFailed { detail: String },

    #[error("unable to determine video dimensions: {detail}")]
    DimensionsUnavailable { detail: String },
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Classifies a local video by the dimensions of its first video stream.
pub struct AspectRatioProber {
    runner: Arc<dyn ProcessRunner>,
    ffprobe_path: String,
}

impl AspectRatioProber {
    pub fn new(runner: Arc<dyn ProcessRunner>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            runner,
            ffprobe_path: ffprobe_path.into(),
        }
    }

    fn args(video_path: &Path) -> Vec<String> {
        [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(video_path.to_string_lossy().into_owned()))
        .collect()
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe(&self, video_path: &Path) -> Result<AspectClassification, ProbeError> {
        let output = self
            .runner
            .run(&self.ffprobe_path, &Self::args(video_path))
            .await
            .map_err(|e| ProbeError::ProbeFailed {
                detail: e.to_string(),
            })?;

        if !output.success() {
            return Err(ProbeError::ProbeFailed {
                detail: output.stderr,
            });
        }

        let (width, height) = parse_dimensions(&output.stdout)?;
        let classification = AspectClassification::from_dimensions(width, height).ok_or_else(
            || ProbeError::DimensionsUnavailable {
                detail: format!("reported dimensions {}x{}", width, height),
            },
        )?;

        tracing::info!(
            width = width,
            height = height,
            classification = %classification,
            "Video probe completed"
        );

        Ok(classification)
    }
}

/// Extract `(width, height)` of the first stream from ffprobe JSON.
fn parse_dimensions(stdout: &str) -> Result<(u32, u32), ProbeError> {
    let parsed: ProbeOutput =
        serde_json::from_str(stdout).map_err(|e| ProbeError::DimensionsUnavailable {
            detail: format!("unreadable ffprobe output: {}", e),
        })?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| ProbeError::DimensionsUnavailable {
            detail: "no video stream found".to_string(),
        })?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok((width, height)),
        (width, height) => Err(ProbeError::DimensionsUnavailable {
            detail: format!("width={:?} height={:?}", width, height),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let stdout = r#"{"programs": [], "streams": [{"width": 1920, "height": 1080}]}"#;
        assert_eq!(parse_dimensions(stdout).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_parse_uses_first_stream() {
        let stdout = r#"{"streams": [{"width": 1080, "height": 1920}, {"width": 10, "height": 10}]}"#;
        assert_eq!(parse_dimensions(stdout).unwrap(), (1080, 1920));
    }

    #[test]
    fn test_missing_or_zero_dimensions() {
        for stdout in [
            r#"{"streams": []}"#,
            r#"{}"#,
            r#"{"streams": [{"width": 1920}]}"#,
            r#"{"streams": [{"width": 0, "height": 1080}]}"#,
        ] {
            assert!(
                matches!(
                    parse_dimensions(stdout),
                    Err(ProbeError::DimensionsUnavailable { .. })
                ),
                "expected DimensionsUnavailable for {}",
                stdout
            );
        }
    }

    #[test]
    fn test_unreadable_output() {
        let result = parse_dimensions("not json");
        assert!(matches!(
            result,
            Err(ProbeError::DimensionsUnavailable { ref detail }) if detail.contains("unreadable")
        ));
    }

    #[test]
    fn test_args_select_first_video_stream() {
        let args = AspectRatioProber::args(Path::new("/tmp/abc.mp4"));
        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height",
                "-of",
                "json",
                "/tmp/abc.mp4",
            ]
        );
    }
}
