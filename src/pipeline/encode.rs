//! Image encoding for raster capture: `DynamicImage` → JPEG bytes.
//!
//! Captured pages are flattened to RGB (JPEG has no alpha) and encoded at
//! the configured quality, expressed in (0, 1] like the export options.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

/// Encode a captured page as JPEG.
pub fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, image::ImageError> {
    let q = (quality.clamp(0.01, 1.0) * 100.0).round() as u8;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, q);
    rgb.write_with_encoder(encoder)?;

    debug!(
        "Encoded {}x{} page → {} bytes JPEG (q={})",
        img.width(),
        img.height(),
        buf.len(),
        q
    );
    Ok(buf)
}
