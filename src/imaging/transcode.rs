//! Byte-buffer image transcoding: optimize and thumbnail.
//!
//! Both operations are one-shot pure functions of (input bytes, options) →
//! output bytes. Decoding, resizing, and encoding happen entirely in memory;
//! the caller owns both buffers and decides where the result is stored.
//!
//! Failure is deliberately asymmetric: undecodable input is a hard
//! [`ImagingError::Decode`] the caller must surface (the upload is
//! deterministically bad, there is nothing to retry), while everything else
//! over a decodable image and in-range options must succeed.

use super::calculations::{fit_within, scale_to_width};
use super::format::OutputFormat;
use super::params::{OptimizeOptions, Quality, ThumbnailSize};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode {format} output: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

/// A re-encoded image ready for the caller to persist.
///
/// Carries the final pixel dimensions so callers can store display sizes
/// without decoding the buffer again.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub bytes: Vec<u8>,
    /// Original stem with the extension of the chosen output format.
    pub filename: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Re-encode an uploaded image for web delivery.
///
/// Keeps the input format for JPEG/PNG/WebP/GIF (or forces WebP), scales
/// down to `max_width` when the image is wider, and flattens alpha onto
/// white only when the chosen output format cannot carry it.
pub fn optimize_image(
    bytes: &[u8],
    filename: &str,
    options: &OptimizeOptions,
) -> Result<OptimizedImage, ImagingError> {
    let (mut img, detected) = decode(bytes)?;
    let format = OutputFormat::choose(detected, options.force_webp);

    if !format.supports_transparency() && img.color().has_alpha() {
        img = flatten_onto_white(&img);
    }

    if let Some((w, h)) = scale_to_width(img.dimensions(), options.max_width) {
        img = img.resize_exact(w, h, FilterType::Lanczos3);
    }

    let (width, height) = img.dimensions();
    Ok(OptimizedImage {
        bytes: encode(&img, format, options.quality)?,
        filename: replace_extension(filename, format.extension()),
        mime_type: format.mime_type(),
        width,
        height,
    })
}

/// Produce a bounded-box JPEG preview.
///
/// Always flattens alpha (the output is JPEG, quality 85) and scales down —
/// never up — so both dimensions fit within `size`, aspect ratio preserved.
pub fn thumbnail_image(
    bytes: &[u8],
    filename: Option<&str>,
    size: ThumbnailSize,
) -> Result<OptimizedImage, ImagingError> {
    let (mut img, _) = decode(bytes)?;

    if img.color().has_alpha() {
        img = flatten_onto_white(&img);
    }

    if let Some((w, h)) = fit_within(img.dimensions(), (size.width, size.height)) {
        img = img.resize_exact(w, h, FilterType::Lanczos3);
    }

    let filename = match filename {
        Some(name) => format!("{}_thumb.jpg", stem(name)),
        None => "thumbnail.jpg".to_string(),
    };

    let (width, height) = img.dimensions();
    Ok(OptimizedImage {
        bytes: encode(&img, OutputFormat::Jpeg, Quality::new(85))?,
        filename,
        mime_type: OutputFormat::Jpeg.mime_type(),
        width,
        height,
    })
}

/// Decode a byte buffer, reporting the container format when detectable.
fn decode(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), ImagingError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImagingError::Io)?;
    let detected = reader.format();
    let img = reader.decode().map_err(ImagingError::Decode)?;
    Ok((img, detected))
}

/// Composite onto an opaque white background, dropping the alpha channel.
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let (w, h) = img.dimensions();
    let mut canvas = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Encode with format-appropriate parameters: quality for JPEG/WebP, method 6
/// for WebP, best compression for PNG.
fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, ImagingError> {
    let encode_err = |message: String| ImagingError::Encode {
        format: format.extension(),
        message,
    };

    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // The JPEG encoder only accepts 8-bit luma/RGB; alpha was
            // flattened upstream, this handles 16-bit and friends.
            let normalized;
            let img = match img {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
                _ => {
                    normalized = DynamicImage::ImageRgb8(img.to_rgb8());
                    &normalized
                }
            };
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            img.write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Best,
                image::codecs::png::FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        OutputFormat::Gif => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        OutputFormat::WebP => {
            let normalized = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            let encoder = webp::Encoder::from_image(&normalized)
                .map_err(|msg| encode_err(msg.to_string()))?;
            let mut config =
                webp::WebPConfig::new().map_err(|_| encode_err("invalid config".to_string()))?;
            config.quality = quality.value() as f32;
            config.method = 6;
            let encoded = encoder
                .encode_advanced(&config)
                .map_err(|e| encode_err(format!("{e:?}")))?;
            buf = encoded.to_vec();
        }
    }
    Ok(buf)
}

/// Filename stem, matching a right-split on the last dot.
fn stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name)
}

fn replace_extension(name: &str, ext: &str) -> String {
    format!("{}.{}", stem(name), ext)
}
