//! Image processing — pure Rust where possible, libwebp for lossy WebP.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode (JPEG, PNG, WebP, GIF)** | `image` crate, format guessed from magic bytes |
//! | **Resize** | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | **Flatten alpha** | white canvas + `image::imageops::overlay` |
//! | **Encode JPEG/PNG/GIF** | `image` crate encoders |
//! | **Encode WebP** | `webp` crate (libwebp, quality + method 6) |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Params**: option structs describing what to do
//! - **Format**: output format selection and its per-format encoder table
//! - **Transcode**: the byte-buffer-in, byte-buffer-out operations

mod calculations;
mod format;
mod params;
mod transcode;

pub use format::OutputFormat;
pub use params::{OptimizeOptions, Quality, ThumbnailSize};
pub use transcode::{ImagingError, OptimizedImage, optimize_image, thumbnail_image};
