/// Preview generation for the selected image
/// Decodes once, downsizes to a bounded JPEG for display
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::error::{AcquireError, InputError};
use crate::state::data::{ImagePayload, Preview};

/// JPEG quality of generated previews
const PREVIEW_QUALITY: u8 = 80;

/// Generate a preview for an image
/// Runs the decode on the blocking pool so the UI stays responsive
pub async fn generate_preview(image: ImagePayload, max_size: u32) -> Result<Preview, AcquireError> {
    tokio::task::spawn_blocking(move || generate_preview_blocking(&image, max_size))
        .await
        .map_err(|e| AcquireError::Join(e.to_string()))?
}

/// Blocking version of preview generation
pub fn generate_preview_blocking(image: &ImagePayload, max_size: u32) -> Result<Preview, AcquireError> {
    let kind = image.kind().ok_or(InputError::UnsupportedFormat)?;

    let decoded = image::load_from_memory_with_format(image.bytes(), kind.image_format())
        .map_err(|e| InputError::Undecodable(e.to_string()))?;

    // Only ever shrink
    let preview = if decoded.width() > max_size || decoded.height() > max_size {
        decoded.thumbnail(max_size, max_size)
    } else {
        decoded
    };

    let jpeg = encode_jpeg(&preview)?;

    tracing::debug!(
        "Generated {}x{} preview for {} ({} KB)",
        preview.width(),
        preview.height(),
        image.file_name(),
        jpeg.len() / 1024
    );

    Ok(Preview {
        width: preview.width(),
        height: preview.height(),
        jpeg: jpeg.into(),
    })
}

/// Encode to JPEG. JPEG has no alpha channel, so flatten to RGB first.
fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, AcquireError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, PREVIEW_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| InputError::Undecodable(format!("failed to encode preview: {}", e)))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    /// Encode a solid-colour test image
    pub(crate) fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([20, 120, 200, 255]),
        ));
        let img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let image = ImagePayload::new("reef.png", sample_image(1600, 800, ImageFormat::Png));
        let preview = generate_preview_blocking(&image, 400).unwrap();
        assert_eq!((preview.width, preview.height), (400, 200));
        assert_eq!(&preview.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let image = ImagePayload::new("reef.jpg", sample_image(64, 48, ImageFormat::Jpeg));
        let preview = generate_preview_blocking(&image, 400).unwrap();
        assert_eq!((preview.width, preview.height), (64, 48));
        assert_eq!(&preview.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_truncated_image_is_undecodable() {
        let mut bytes = sample_image(64, 64, ImageFormat::Png);
        bytes.truncate(40);
        let image = ImagePayload::new("broken.png", bytes);
        assert!(matches!(
            generate_preview_blocking(&image, 400),
            Err(AcquireError::Input(InputError::Undecodable(_)))
        ));
    }

    #[tokio::test]
    async fn test_generate_preview_async() {
        let image = ImagePayload::new("reef.png", sample_image(32, 32, ImageFormat::Png));
        let preview = generate_preview(image, 16).await.unwrap();
        assert_eq!((preview.width, preview.height), (16, 16));
    }
}
