//! Screenshot compression.
//!
//! Pasted screenshots are shrunk into a bounding box and re-encoded as JPEG so a
//! day's images fit the store's small capacity budget. The encoded data URL is the
//! only artifact kept; originals are dropped after encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_IMAGE_MAX_HEIGHT, DEFAULT_IMAGE_MAX_WIDTH, DEFAULT_IMAGE_QUALITY,
    DETAIL_IMAGE_MAX_HEIGHT, DETAIL_IMAGE_MAX_WIDTH,
};
use crate::errors::{DecodeError, Error, Result, ValidationError};

const JPEG_MIME: &str = "image/jpeg";

/// Bounding box and quality for [`compress_image`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality on the 0..1 scale
    pub quality: f32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_IMAGE_MAX_WIDTH,
            max_height: DEFAULT_IMAGE_MAX_HEIGHT,
            quality: DEFAULT_IMAGE_QUALITY,
        }
    }
}

impl CompressOptions {
    /// Larger preset used when attaching images from the day-detail view.
    pub fn detail() -> Self {
        Self {
            max_width: DETAIL_IMAGE_MAX_WIDTH,
            max_height: DETAIL_IMAGE_MAX_HEIGHT,
            ..Self::default()
        }
    }

    /// Quality mapped onto the JPEG encoder's 1..=100 scale.
    fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() {
            self.quality.clamp(0.0, 1.0)
        } else {
            DEFAULT_IMAGE_QUALITY
        };
        ((q * 100.0).round() as u8).clamp(1, 100)
    }

    fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "image bounds must be positive, got {}x{}",
                self.max_width, self.max_height
            ))));
        }
        Ok(())
    }
}

/// A screenshot after compression, ready to be stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Uniform downscale factor that fits `(width, height)` into the bounding box.
/// Never greater than 1.
pub fn downscale_factor(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    let fx = f64::from(max_width) / f64::from(width);
    let fy = f64::from(max_height) / f64::from(height);
    1.0_f64.min(fx).min(fy)
}

/// Target dimensions after applying [`downscale_factor`].
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = downscale_factor(width, height, max_width, max_height);
    let w = ((f64::from(width) * scale).round() as u32).clamp(1, max_width.max(1));
    let h = ((f64::from(height) * scale).round() as u32).clamp(1, max_height.max(1));
    (w.min(width.max(1)), h.min(height.max(1)))
}

/// Decodes `raw` (any supported raster format), fits it into the bounding box
/// without upscaling and re-encodes it as JPEG.
pub fn compress_image(raw: &[u8], options: &CompressOptions) -> Result<CompressedImage> {
    options.validate()?;

    let decoded = image::load_from_memory(raw).map_err(DecodeError::from)?;
    let (iw, ih) = (decoded.width(), decoded.height());
    let (w, h) = target_dimensions(iw, ih, options.max_width, options.max_height);

    let resized = if (w, h) == (iw, ih) {
        decoded
    } else {
        decoded.resize_exact(w, h, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, options.jpeg_quality())
        .encode_image(&rgb)
        .map_err(DecodeError::from)?;

    debug!(
        "Compressed screenshot {}x{} -> {}x{} ({} bytes)",
        iw,
        ih,
        w,
        h,
        encoded.len()
    );

    Ok(CompressedImage {
        data_url: format!("data:{};base64,{}", JPEG_MIME, BASE64.encode(&encoded)),
        width: w,
        height: h,
    })
}

/// Approximate decoded size of an inline image, for quota warnings only.
///
/// Counts three bytes per four base64 characters after the data URL header.
pub fn estimate_encoded_size(encoded: &str) -> usize {
    if encoded.is_empty() {
        return 0;
    }
    let payload = match encoded.find(',') {
        Some(idx) => &encoded[idx + 1..],
        None => encoded,
    };
    payload.len() * 3 / 4
}

/// Splits a `data:<mime>;base64,<payload>` URL into its MIME type and bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::DataUrl("missing 'data:' prefix".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::DataUrl("missing ',' separator".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| DecodeError::DataUrl("only base64 payloads are supported".to_string()))?;
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| DecodeError::DataUrl(e.to_string()))?;
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    Ok((mime.to_string(), bytes))
}
