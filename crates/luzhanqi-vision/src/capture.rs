//! Frame acquisition from files and base64 payloads.
//!
//! The camera subsystem is an external collaborator; these constructors are
//! the delivery surface it (or any stand-in, such as a saved photo) uses to
//! hand one raw frame to the pipeline.

use image::ImageFormat;

use crate::types::{FrameSource, RawFrame, VisionError, VisionResult};

/// Load a frame from an image file on disk.
pub fn frame_from_file(path: &str) -> VisionResult<RawFrame> {
    let img = image::open(path)?;
    let frame = RawFrame::new(
        img,
        FrameSource::File {
            path: path.to_string(),
        },
    );
    tracing::debug!("loaded frame {}x{} from {path}", frame.dimensions().0, frame.dimensions().1);
    Ok(frame)
}

/// Decode a frame from base64-encoded image data.
pub fn frame_from_base64(data: &str, mime: &str) -> VisionResult<RawFrame> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| VisionError::InvalidInput(format!("Invalid base64: {e}")))?;

    let format = match mime {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/webp" => Some(ImageFormat::WebP),
        _ => None,
    };

    let img = if let Some(fmt) = format {
        image::load_from_memory_with_format(&bytes, fmt)?
    } else {
        image::load_from_memory(&bytes)?
    };

    Ok(RawFrame::new(
        img,
        FrameSource::Base64 {
            mime: mime.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(w, h);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_frame_from_file_missing() {
        assert!(frame_from_file("/nonexistent/pieces.jpg").is_err());
    }

    #[test]
    fn test_frame_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        std::fs::write(&path, png_bytes(64, 48)).unwrap();

        let frame = frame_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(frame.dimensions(), (64, 48));
    }

    #[test]
    fn test_frame_from_base64() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(32, 32));
        let frame = frame_from_base64(&encoded, "image/png").unwrap();
        assert_eq!(frame.dimensions(), (32, 32));
    }

    #[test]
    fn test_frame_from_base64_invalid() {
        let err = frame_from_base64("!!!not base64!!!", "image/png").unwrap_err();
        assert!(matches!(err, VisionError::InvalidInput(_)));
    }

    #[test]
    fn test_frame_from_base64_undecodable() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"garbage bytes");
        assert!(frame_from_base64(&encoded, "image/png").is_err());
    }
}
