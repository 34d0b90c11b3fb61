use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

/// JPEG quality for the upload copy. OCR.space caps free-tier uploads at
/// 1 MB, so the original is shrunk and recompressed before submission.
const UPLOAD_JPEG_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to write resized image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image of {width}x{height} px is too small to halve")]
    TooSmall { width: u32, height: u32 },
    #[error("Failed to encode resized image: {0}")]
    Encode(String),
}

/// A downscaled, JPEG-encoded copy of the source image, ready for upload.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Load an image file, halve both dimensions (integer division), re-encode
/// as JPEG, persist the copy to `out_path` and return the encoded bytes.
pub fn shrink_to_half(path: &Path, out_path: &Path) -> Result<ResizedImage, PreprocessError> {
    let resized = shrink(image::open(path)?)?;
    std::fs::write(out_path, &resized.bytes)?;
    Ok(resized)
}

/// Halve raw image bytes (JPEG / PNG / WEBP / …) without touching disk.
pub fn shrink_from_bytes(data: &[u8]) -> Result<ResizedImage, PreprocessError> {
    shrink(image::load_from_memory(data)?)
}

fn shrink(img: DynamicImage) -> Result<ResizedImage, PreprocessError> {
    let (width, height) = (img.width() / 2, img.height() / 2);
    if width == 0 || height == 0 {
        return Err(PreprocessError::TooSmall {
            width: img.width(),
            height: img.height(),
        });
    }

    let scaled = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    // JPEG has no alpha channel; flatten before encoding.
    let rgb = scaled.to_rgb8();

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, UPLOAD_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;

    Ok(ResizedImage { width, height, bytes })
}
