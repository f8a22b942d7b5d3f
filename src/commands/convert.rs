//! Conversion entry points.

use tracing::debug;

use crate::core::{BatchProgress, ConversionOptions, ConversionOutcome, RawImageHandle};
use crate::processing::BatchProcessor;
use crate::utils::{ConverterError, ConverterResult};

/// Converts a batch of images.
///
/// # Arguments
/// * `images` - Inputs in display order; non-image media types are skipped
/// * `options` - Max width and quality shared by every item
/// * `on_progress` - Called with `(index, total, name)` before each item, `index` 1-based
/// * `on_item_complete` - Called once per item with its outcome
///
/// # Returns
/// One outcome per accepted input, in input order. Fails only with
/// [`ConverterError::Configuration`], before any item is touched.
pub async fn run<H, P, C>(
    images: Vec<H>,
    options: ConversionOptions,
    mut on_progress: P,
    on_item_complete: C,
) -> ConverterResult<Vec<ConversionOutcome>>
where
    H: RawImageHandle,
    P: FnMut(usize, usize, &str) + Send,
    C: FnMut(&ConversionOutcome) + Send,
{
    debug!("Received run command for {} inputs", images.len());
    let processor = BatchProcessor::new(options)?;

    processor
        .run(
            images,
            |progress: &BatchProgress| {
                on_progress(progress.index, progress.total, &progress.current_name)
            },
            on_item_complete,
        )
        .await
}

/// Converts a single image.
///
/// This is a convenience wrapper around [`run`]. A non-image input yields
/// an error rather than an empty result.
pub async fn convert_image<H: RawImageHandle>(
    image: H,
    options: ConversionOptions,
) -> ConverterResult<ConversionOutcome> {
    let name = image.name().to_string();
    run(vec![image], options, |_, _, _| {}, |_| {})
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ConverterError::decode(format!("'{name}' is not an image")))
}
