//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They all carry
//! serde derives so the CLI can read them straight out of a TOML config
//! section; library callers construct them directly.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100). Clamped on construction
/// rather than rejected: out-of-range values in stored config should degrade,
/// not fail an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Options for [`optimize_image`](super::optimize_image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    /// Images wider than this are scaled down proportionally. Never upscales.
    pub max_width: u32,
    /// Applies to JPEG and WebP output only.
    pub quality: Quality,
    /// Re-encode as WebP regardless of the input format.
    pub force_webp: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1200,
            quality: Quality::default(),
            force_webp: false,
        }
    }
}

/// Bounding box for [`thumbnail_image`](super::thumbnail_image). The result
/// fits within the box with aspect ratio preserved; it is not a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
        }
    }
}
