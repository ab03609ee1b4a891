//! Output format selection.
//!
//! The pipeline writes exactly four formats. Input formats outside this set
//! (TIFF, BMP, ...) fall back to JPEG, and an input whose format cannot be
//! detected at all is treated the same way.

use image::ImageFormat;

/// Encodable output format and its wire-level properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl OutputFormat {
    /// Pick the output format for a transcode.
    ///
    /// `force_webp` wins outright; otherwise a recognized input format is
    /// kept so its benefits (PNG transparency, WebP compression) survive
    /// re-encoding, and anything else becomes JPEG.
    pub fn choose(detected: Option<ImageFormat>, force_webp: bool) -> Self {
        if force_webp {
            return Self::WebP;
        }
        match detected {
            Some(ImageFormat::Jpeg) => Self::Jpeg,
            Some(ImageFormat::Png) => Self::Png,
            Some(ImageFormat::WebP) => Self::WebP,
            Some(ImageFormat::Gif) => Self::Gif,
            _ => Self::Jpeg,
        }
    }

    /// Filename extension for the encoded output.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Whether the encoded form can carry an alpha channel. Images headed
    /// for a format that cannot are flattened onto white first.
    pub fn supports_transparency(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}
