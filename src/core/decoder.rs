use crate::domain::model::ImagePayload;
use crate::utils::error::{ManifestError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Maximum decoded image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// How to treat input without a `<header>,` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataUrlMode {
    /// 沒有逗號就視為無效輸入
    #[default]
    Strict,
    /// 沒有逗號時整個字串都當作 base64 內容
    Lenient,
}

/// Decode a `<header>,<base64-payload>` data URL into raw image bytes.
///
/// Splits on the first comma only. The header is informational: a
/// `data:<media-type>[;base64]` header yields the media type, anything else is
/// ignored.
pub fn decode_data_url(input: &str, mode: DataUrlMode) -> Result<ImagePayload> {
    let (header, encoded) = match input.split_once(',') {
        Some((header, encoded)) => (Some(header), encoded),
        None => match mode {
            DataUrlMode::Strict => {
                return Err(ManifestError::invalid_input(
                    "missing ',' separator in data URL",
                ))
            }
            DataUrlMode::Lenient => (None, input),
        },
    };

    // OCR 前端有時會把 base64 切成多行
    let payload: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return Err(ManifestError::invalid_input("image payload is empty"));
    }

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| ManifestError::invalid_input(e.to_string()))?;

    if bytes.is_empty() {
        return Err(ManifestError::invalid_input("image payload is empty"));
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ManifestError::invalid_input(format!(
            "image is too large: {} bytes (max: {} bytes)",
            bytes.len(),
            MAX_IMAGE_SIZE
        )));
    }

    Ok(ImagePayload::new(bytes, header.and_then(media_type)))
}

fn media_type(header: &str) -> Option<String> {
    let rest = header.trim().strip_prefix("data:")?;
    let media_type = rest.split(';').next()?.trim();
    if media_type.is_empty() {
        None
    } else {
        Some(media_type.to_ascii_lowercase())
    }
}

/// Decode image bytes and force a 3-channel RGB colour model.
pub fn normalize_image(bytes: &[u8]) -> Result<DynamicImage> {
    let image =
        image::load_from_memory(bytes).map_err(|e| ManifestError::invalid_input(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_png_data_url() {
        let png = tiny_png();
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let payload = decode_data_url(&url, DataUrlMode::Strict).unwrap();

        assert_eq!(payload.bytes, png);
        assert_eq!(payload.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_strict_mode_rejects_missing_comma() {
        let encoded = STANDARD.encode(tiny_png());
        let err = decode_data_url(&encoded, DataUrlMode::Strict).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidInput { .. }));
    }

    #[test]
    fn test_lenient_mode_accepts_bare_payload() {
        let png = tiny_png();
        let payload = decode_data_url(&STANDARD.encode(&png), DataUrlMode::Lenient).unwrap();
        assert_eq!(payload.bytes, png);
        assert!(payload.media_type.is_none());
    }

    #[test]
    fn test_splits_on_first_comma_only() {
        // 第二個逗號屬於 payload，應導致 base64 解碼失敗
        let err = decode_data_url("data:image/png;base64,AAAA,BBBB", DataUrlMode::Strict)
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidInput { .. }));
    }

    #[test]
    fn test_invalid_base64_carries_cause() {
        let err = decode_data_url("data:image/png;base64,!!!", DataUrlMode::Strict).unwrap_err();
        match err {
            ManifestError::InvalidInput { message } => assert!(!message.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        assert!(decode_data_url("data:image/png;base64,", DataUrlMode::Strict).is_err());
        assert!(decode_data_url("", DataUrlMode::Lenient).is_err());
    }

    #[test]
    fn test_image_at_size_cap_is_accepted() {
        let url = format!(
            "data:image/png;base64,{}",
            STANDARD.encode(vec![0u8; MAX_IMAGE_SIZE])
        );
        let payload = decode_data_url(&url, DataUrlMode::Strict).unwrap();
        assert_eq!(payload.bytes.len(), MAX_IMAGE_SIZE);
    }

    #[test]
    fn test_image_over_size_cap_is_rejected() {
        let url = format!(
            "data:image/png;base64,{}",
            STANDARD.encode(vec![0u8; MAX_IMAGE_SIZE + 1])
        );
        match decode_data_url(&url, DataUrlMode::Strict).unwrap_err() {
            ManifestError::InvalidInput { message } => {
                assert!(message.contains("too large"));
                assert!(message.contains(&MAX_IMAGE_SIZE.to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_payload_with_line_breaks() {
        let png = tiny_png();
        let encoded = STANDARD.encode(&png);
        let (head, tail) = encoded.split_at(8);
        let url = format!("data:image/png;base64,{}\n{}\n", head, tail);

        let payload = decode_data_url(&url, DataUrlMode::Strict).unwrap();
        assert_eq!(payload.bytes, png);
    }

    #[test]
    fn test_normalize_image_forces_rgb() {
        let image = normalize_image(&tiny_png()).unwrap();
        assert_eq!(image.color().channel_count(), 3);
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn test_normalize_image_rejects_garbage() {
        let err = normalize_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ManifestError::InvalidInput { .. }));
    }
}
