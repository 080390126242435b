//! JPEG encoding and data-URL transport encoding for normalized images.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use crate::types::{NormalizedImage, VisionResult};

/// JPEG quality for outbound frames. Maximum, matching what the inference
/// providers are sent.
const JPEG_QUALITY: u8 = 100;

/// Encode a normalized image as a JPEG byte stream at maximum quality.
pub fn to_jpeg(image: &NormalizedImage) -> VisionResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    image.as_rgb().write_with_encoder(encoder)?;
    Ok(buf)
}

/// Base64-encode the JPEG stream for providers that take inline image data.
pub fn to_base64_jpeg(image: &NormalizedImage) -> VisionResult<String> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.encode(to_jpeg(image)?))
}

/// Render the image as a `data:` URL for chat-style vision endpoints.
pub fn to_data_url(image: &NormalizedImage) -> VisionResult<String> {
    Ok(format!("data:image/jpeg;base64,{}", to_base64_jpeg(image)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NORMALIZED_EDGE;
    use image::{GenericImageView, RgbImage};

    fn normalized() -> NormalizedImage {
        NormalizedImage::new(RgbImage::new(NORMALIZED_EDGE, NORMALIZED_EDGE)).unwrap()
    }

    #[test]
    fn test_jpeg_roundtrip_dimensions() {
        let bytes = to_jpeg(&normalized()).unwrap();
        assert!(!bytes.is_empty());

        let loaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(loaded.dimensions(), (NORMALIZED_EDGE, NORMALIZED_EDGE));
    }

    #[test]
    fn test_data_url_shape() {
        let url = to_data_url(&normalized()).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert!(url.len() > "data:image/jpeg;base64,".len());
    }

    #[test]
    fn test_base64_decodes() {
        use base64::Engine;
        let encoded = to_base64_jpeg(&normalized()).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]); // JPEG SOI marker
    }
}
