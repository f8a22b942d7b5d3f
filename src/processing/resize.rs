// src/processing/resize.rs

//! Resize planning and pixel resampling.
//!
//! Planning only ever shrinks: width is clamped to the requested maximum and
//! height follows proportionally. Resampling uses a Lanczos3 convolution via
//! `fast_image_resize` and skips all work when the plan keeps the source size.

use std::borrow::Cow;

use fast_image_resize as fr;
use image::{ImageBuffer, Rgba};
use image::imageops::FilterType;
use tracing::{debug, warn};

use crate::core::{MaxWidth, TargetDimensions};
use crate::utils::{ConverterError, ConverterResult};

type Result<T> = ConverterResult<T>;

/// Computes output dimensions for a source image.
///
/// Returns the source dimensions unchanged for [`MaxWidth::Original`] or when
/// the source already fits. Otherwise the width becomes `max_width` and the
/// height is `round(source_height * max_width / source_width)`, rounded half
/// away from zero and never below one pixel.
pub fn plan(
    source_width: u32,
    source_height: u32,
    max_width: MaxWidth,
) -> Result<TargetDimensions> {
    if source_width == 0 || source_height == 0 {
        return Err(ConverterError::invariant(format!(
            "Cannot plan resize for {source_width}×{source_height} source"
        )));
    }

    let unchanged = TargetDimensions { width: source_width, height: source_height };

    let max_width = match max_width {
        MaxWidth::Original => return Ok(unchanged),
        MaxWidth::Pixels(0) => {
            return Err(ConverterError::invariant("Cannot plan resize for max width 0"));
        }
        MaxWidth::Pixels(px) => px,
    };

    if source_width <= max_width {
        return Ok(unchanged);
    }

    // Integer form of round-half-away-from-zero for positive operands. The
    // numerator needs 66 bits for u32 inputs; the quotient is at most
    // source_height because max_width < source_width.
    let numerator = 2 * source_height as u128 * max_width as u128 + source_width as u128;
    let height = (numerator / (2 * source_width as u128)).max(1) as u32;

    Ok(TargetDimensions { width: max_width, height })
}

/// Resamples an RGBA buffer to `target` dimensions.
///
/// Borrows the input unchanged when the target matches the source.
pub fn resample<'a>(
    source: &'a [u8],
    source_width: u32,
    source_height: u32,
    target: TargetDimensions,
) -> Result<Cow<'a, [u8]>> {
    let expected = TargetDimensions { width: source_width, height: source_height }
        .rgba_len()
        .ok_or_else(|| ConverterError::invariant("Source dimensions overflow"))?;

    if source.len() != expected {
        return Err(ConverterError::invariant(format!(
            "Source buffer is {} bytes, expected {} for {}×{} RGBA",
            source.len(),
            expected,
            source_width,
            source_height
        )));
    }

    if target.width == 0 || target.height == 0 {
        return Err(ConverterError::invariant(format!("Cannot resample to {target}")));
    }

    if target.width == source_width && target.height == source_height {
        return Ok(Cow::Borrowed(source));
    }

    debug!(
        "Resampling {}×{} -> {}×{}",
        source_width, source_height, target.width, target.height
    );

    match resample_convolution(source, source_width, source_height, target) {
        Ok(pixels) => Ok(Cow::Owned(pixels)),
        Err(err) => {
            warn!("fast_image_resize failed, falling back to image::imageops: {}", err);
            resample_fallback(source, source_width, source_height, target).map(Cow::Owned)
        }
    }
}

fn resample_convolution(
    source: &[u8],
    source_width: u32,
    source_height: u32,
    target: TargetDimensions,
) -> Result<Vec<u8>> {
    let src_image =
        fr::images::ImageRef::new(source_width, source_height, source, fr::PixelType::U8x4)
            .map_err(|e| ConverterError::invariant(format!("Invalid source buffer: {e}")))?;

    let mut dst_image = fr::images::Image::new(target.width, target.height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ConverterError::invariant(format!("Resample failed: {e}")))?;

    Ok(dst_image.into_vec())
}

fn resample_fallback(
    source: &[u8],
    source_width: u32,
    source_height: u32,
    target: TargetDimensions,
) -> Result<Vec<u8>> {
    let rgba =
        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(source_width, source_height, source.to_vec())
            .ok_or_else(|| ConverterError::invariant("Source buffer length mismatch"))?;

    let resized = image::imageops::resize(&rgba, target.width, target.height, FilterType::Lanczos3);
    Ok(resized.into_raw())
}
