//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or pixels.
//! `None` consistently means "leave the image at its original size" — the
//! pipeline never upscales.

/// Target dimensions for constraining an image to a maximum width.
///
/// Returns `None` when the image is already at or under `max_width`.
/// Otherwise the width becomes exactly `max_width` and the height scales
/// proportionally, rounded to the nearest pixel (minimum 1).
pub fn scale_to_width(source: (u32, u32), max_width: u32) -> Option<(u32, u32)> {
    let (w, h) = source;
    if w <= max_width {
        return None;
    }
    let ratio = max_width as f64 / w as f64;
    let new_h = ((h as f64 * ratio).round() as u32).max(1);
    Some((max_width, new_h))
}

/// Target dimensions for fitting an image inside a bounding box.
///
/// Scales by the smaller of the two ratios so both dimensions fit, aspect
/// ratio preserved. Returns `None` when the image already fits.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> Option<(u32, u32)> {
    let (w, h) = source;
    let (max_w, max_h) = bounds;
    if w <= max_w && h <= max_h {
        return None;
    }
    let ratio = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let new_w = ((w as f64 * ratio).round() as u32).max(1);
    let new_h = ((h as f64 * ratio).round() as u32).max(1);
    Some((new_w, new_h))
}
