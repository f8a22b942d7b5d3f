// src/processing/formats.rs

//! Maps conversion quality to a lossy WebP encode.

use tracing::debug;
use webp::{Encoder, WebPConfig};

use crate::core::TargetDimensions;
use crate::utils::{ConverterError, ConverterResult};

type Result<T> = ConverterResult<T>;

// ── Encoder constants ──────────────────────────────────────────

/// 0 = fastest, 6 = smallest; 4 balances encode latency against size.
const WEBP_EFFORT: i32 = 4;
/// Largest width or height a WebP bitstream can carry.
pub const MAX_WEBP_DIMENSION: u32 = 16383;

/// Encodes an RGBA buffer as lossy WebP.
///
/// Output is byte-identical for identical inputs. `quality` runs from 1 to
/// 100 and drives both colour and alpha quality.
pub fn encode_webp(pixels: &[u8], width: u32, height: u32, quality: u32) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ConverterError::encode(format!("Quality {quality} outside 1-100")));
    }

    if width == 0 || height == 0 {
        return Err(ConverterError::encode(format!("Cannot encode {width}×{height} image")));
    }

    if width > MAX_WEBP_DIMENSION || height > MAX_WEBP_DIMENSION {
        return Err(ConverterError::encode(format!(
            "{width}×{height} exceeds the WebP limit of {MAX_WEBP_DIMENSION} pixels per side"
        )));
    }

    let expected = TargetDimensions { width, height }
        .rgba_len()
        .ok_or_else(|| ConverterError::encode("Image dimensions overflow"))?;
    if pixels.len() != expected {
        return Err(ConverterError::encode(format!(
            "Pixel buffer is {} bytes, expected {} for {}×{} RGBA",
            pixels.len(),
            expected,
            width,
            height
        )));
    }

    let mut config = WebPConfig::new()
        .map_err(|_| ConverterError::encode("Failed to initialise WebP config"))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.alpha_quality = quality as i32;
    config.method = WEBP_EFFORT;

    let encoded = Encoder::from_rgba(pixels, width, height)
        .encode_advanced(&config)
        .map_err(|e| ConverterError::encode(format!("WebP encode failed: {e:?}")))?;

    debug!("Encoded {}×{} at q{} -> {} bytes", width, height, quality, encoded.len());

    Ok(encoded.to_vec())
}
