// src/processing/executor.rs

//! Drives one item through decode, plan, resample and encode.
//!
//! Runs synchronously; the batch processor calls it from
//! `tokio::task::spawn_blocking` so the async runtime is never blocked.

use tracing::debug;

use crate::core::{ConversionOptions, ConversionOutcome, RawImageHandle, SourceImage};
use crate::utils::{ConverterResult, output_file_name};

use super::formats::encode_webp;
use super::resize::{plan, resample};

/// Pipeline stages an item passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    Queued,
    Decoding,
    Planning,
    Resampling,
    Encoding,
    Completed,
    Failed,
}

impl ItemStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Converts one input, returning its successful outcome.
///
/// `stage` is left at the stage that was running when an error occurred, or
/// at [`ItemStage::Completed`].
pub fn convert_single<H: RawImageHandle + ?Sized>(
    handle: &H,
    options: &ConversionOptions,
    stage: &mut ItemStage,
) -> ConverterResult<ConversionOutcome> {
    *stage = ItemStage::Decoding;
    let source: SourceImage = handle.decode()?;

    *stage = ItemStage::Planning;
    let target = plan(source.width, source.height, options.max_width)?;
    debug!(
        "'{}': {}×{} -> {} (max width {})",
        source.name, source.width, source.height, target, options.max_width
    );

    *stage = ItemStage::Resampling;
    let pixels = resample(&source.pixels, source.width, source.height, target)?;

    *stage = ItemStage::Encoding;
    let encoded_bytes = encode_webp(&pixels, target.width, target.height, options.quality)?;

    *stage = ItemStage::Completed;

    // The handle's size is what the shell reports; fall back to the decoded input length.
    let original_byte_size = match handle.byte_size() {
        0 => source.byte_size,
        size => size,
    };

    Ok(ConversionOutcome::Success {
        original_name: handle.name().to_string(),
        new_name: output_file_name(handle.name(), options.max_width, options.quality),
        original_byte_size,
        encoded_byte_size: encoded_bytes.len() as u64,
        target_dimensions: target,
        encoded_bytes,
    })
}
