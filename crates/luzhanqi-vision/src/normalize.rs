//! Centered square crop and fixed-size normalization.
//!
//! Deterministic and pure: the same input bitmap always yields the same
//! output bitmap. No network, no I/O, no configuration.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::types::{NormalizedImage, RawFrame, VisionError, VisionResult, NORMALIZED_EDGE};

/// Crop a frame to its largest centered square and scale it to exactly
/// 512×512.
///
/// Fails with [`VisionError::EmptyFrame`] on a zero-sized frame before any
/// further work happens.
pub fn normalize(frame: &RawFrame) -> VisionResult<NormalizedImage> {
    let (width, height) = frame.image.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyFrame { width, height });
    }

    let cropped = crop_to_square(&frame.image);
    let resized = if cropped.dimensions() == (NORMALIZED_EDGE, NORMALIZED_EDGE) {
        // Already at target size; skipping the resampler keeps this an exact
        // identity for 512×512 input.
        cropped
    } else {
        resize_to_fit(&cropped, NORMALIZED_EDGE, NORMALIZED_EDGE)
    };

    NormalizedImage::new(resized.to_rgb8())
}

/// Take the largest centered square region of an image.
///
/// The crop edge is `min(width, height)`; any non-square margin is discarded
/// symmetrically (±1 px from integer rounding).
pub fn crop_to_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let crop = width.min(height);
    let x = (width - crop) / 2;
    let y = (height - crop) / 2;
    img.crop_imm(x, y, crop, crop)
}

/// Uniformly scale an image to fit within the target frame, preserving
/// aspect ratio.
///
/// For square input both candidate ratios are equal and the output fills the
/// target exactly. The ratio comparison only matters for non-square input,
/// which `normalize` never produces; it is kept so behavior stays defined if
/// the crop step is ever bypassed.
pub fn resize_to_fit(img: &DynamicImage, target_w: u32, target_h: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let width_ratio = target_w as f64 / width as f64;
    let height_ratio = target_h as f64 / height as f64;
    let ratio = if width_ratio > height_ratio {
        height_ratio
    } else {
        width_ratio
    };

    let new_w = ((width as f64 * ratio).round() as u32).max(1);
    let new_h = ((height as f64 * ratio).round() as u32).max(1);
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}
