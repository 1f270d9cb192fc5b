//! Aspect ratio classification used to namespace storage keys.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{ASPECT_RATIO_TOLERANCE, LANDSCAPE_RATIO, PORTRAIT_RATIO};

/// Frame shape of a video, derived from its first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClassification {
    Landscape,
    Portrait,
    Other,
}

impl AspectClassification {
    /// Classify a width/height ratio.
    ///
    /// The ratio matches a target when the absolute difference is strictly
    /// less than [`ASPECT_RATIO_TOLERANCE`]; landscape is checked first.
    pub fn from_ratio(ratio: f64) -> Self {
        if (ratio - LANDSCAPE_RATIO).abs() < ASPECT_RATIO_TOLERANCE {
            AspectClassification::Landscape
        } else if (ratio - PORTRAIT_RATIO).abs() < ASPECT_RATIO_TOLERANCE {
            AspectClassification::Portrait
        } else {
            AspectClassification::Other
        }
    }

    /// Classify stream dimensions. Returns `None` when either side is zero.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::from_ratio(f64::from(width) / f64::from(height)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClassification::Landscape => "landscape",
            AspectClassification::Portrait => "portrait",
            AspectClassification::Other => "other",
        }
    }
}

impl Display for AspectClassification {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
