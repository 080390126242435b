//! Core data types for raw frames and normalized images.

use image::{DynamicImage, GenericImageView, RgbImage};
use serde::{Deserialize, Serialize};

/// Edge length of a normalized image (width and height).
pub const NORMALIZED_EDGE: u32 = 512;

/// How a frame was delivered to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameSource {
    File { path: String },
    Base64 { mime: String },
    Memory,
}

/// A raw frame as delivered by the capture collaborator.
///
/// Owned transiently by one pipeline invocation and discarded after
/// normalization.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub image: DynamicImage,
    pub source: FrameSource,
}

impl RawFrame {
    pub fn new(image: DynamicImage, source: FrameSource) -> Self {
        Self { image, source }
    }

    /// Width and height of the underlying bitmap.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A square bitmap at exactly 512×512 — the only image representation
/// that crosses into network code.
#[derive(Debug, Clone)]
pub struct NormalizedImage(RgbImage);

impl NormalizedImage {
    /// Wrap a bitmap, enforcing the fixed-size invariant.
    pub fn new(image: RgbImage) -> VisionResult<Self> {
        let (w, h) = image.dimensions();
        if w != NORMALIZED_EDGE || h != NORMALIZED_EDGE {
            return Err(VisionError::InvalidInput(format!(
                "normalized image must be {NORMALIZED_EDGE}x{NORMALIZED_EDGE}, got {w}x{h}"
            )));
        }
        Ok(Self(image))
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    pub fn into_rgb(self) -> RgbImage {
        self.0
    }
}

/// Errors that can occur in the image core.
#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Empty frame: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type VisionResult<T> = Result<T, VisionError>;
