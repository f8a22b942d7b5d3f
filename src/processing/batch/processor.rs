use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::{
    BatchEvent, BatchProgress, BatchSummary, BatchTicket, ConversionOptions, ConversionOutcome,
    RawImageHandle,
};
use crate::processing::executor::{ItemStage, convert_single};
use crate::utils::{ConverterError, ConverterResult, format_kb, validate_options};

/// Converts a batch of images one at a time, in input order.
///
/// Options are validated once when the processor is built; after that no
/// error aborts the batch except supersession by a newer submission.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    options: ConversionOptions,
    ticket: Option<BatchTicket>,
}

impl BatchProcessor {
    /// Creates a processor, rejecting invalid options before any item runs.
    pub fn new(options: ConversionOptions) -> ConverterResult<Self> {
        validate_options(&options)?;
        debug!(
            "Creating BatchProcessor (max width {}, quality {})",
            options.max_width, options.quality
        );
        Ok(Self { options, ticket: None })
    }

    /// Binds the processor to a ticket so a newer batch can supersede it.
    pub fn with_ticket(mut self, ticket: BatchTicket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    fn is_current(&self) -> bool {
        self.ticket.as_ref().is_none_or(BatchTicket::is_current)
    }

    /// Processes `images`, reporting progress before and the outcome after each item.
    ///
    /// Inputs whose declared media type is not an image are dropped up front
    /// and produce no outcome. Every accepted input yields exactly one
    /// outcome, in input order; per-item errors become
    /// [`ConversionOutcome::Failure`]. Returns [`ConverterError::Superseded`]
    /// if a newer batch was submitted before this one finished.
    pub async fn run<H, P, C>(
        &self,
        images: Vec<H>,
        mut on_progress: P,
        mut on_item_complete: C,
    ) -> ConverterResult<Vec<ConversionOutcome>>
    where
        H: RawImageHandle,
        P: FnMut(&BatchProgress) + Send,
        C: FnMut(&ConversionOutcome) + Send,
    {
        let submitted = images.len();
        let accepted: Vec<H> = images
            .into_iter()
            .filter(|handle| {
                let keep = handle.is_image();
                if !keep {
                    debug!("Skipping '{}' ({})", handle.name(), handle.media_type());
                }
                keep
            })
            .collect();

        let total = accepted.len();
        info!(
            "Processing batch of {} images ({} non-image inputs skipped)",
            total,
            submitted - total
        );

        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);

        for (idx, handle) in accepted.into_iter().enumerate() {
            if !self.is_current() {
                info!("Batch superseded after {}/{} images", idx, total);
                return Err(ConverterError::Superseded);
            }

            on_progress(&BatchProgress::new(idx + 1, total, handle.name()));

            let name = handle.name().to_string();
            let outcome = self.process_item(handle).await;

            match &outcome {
                ConversionOutcome::Success { original_byte_size, encoded_byte_size, .. } => debug!(
                    "'{}' converted ({} -> {}, {}% smaller)",
                    name,
                    format_kb(*original_byte_size),
                    format_kb(*encoded_byte_size),
                    outcome.reduction_percent().unwrap_or_default()
                ),
                ConversionOutcome::Failure { reason, .. } => {
                    warn!("Image conversion failed for {}: {}", name, reason)
                }
            }

            on_item_complete(&outcome);
            outcomes.push(outcome);

            // Let other tasks on a busy runtime run between items.
            tokio::task::yield_now().await;
        }

        if !self.is_current() {
            info!("Batch superseded after its last image; discarding results");
            return Err(ConverterError::Superseded);
        }

        let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed());
        if summary.failed > 0 {
            warn!(
                "Batch completed with {} failed images out of {}",
                summary.failed, summary.image_count
            );
        } else {
            info!(
                "Batch completed: {} images, {} saved ({:.1}%) in {}ms",
                summary.image_count,
                format_kb(summary.saved_bytes.max(0) as u64),
                summary.compression_ratio,
                summary.total_time_ms
            );
        }

        Ok(outcomes)
    }

    /// Runs one item on the blocking pool and folds any error into its outcome.
    async fn process_item<H: RawImageHandle>(&self, handle: H) -> ConversionOutcome {
        let name = handle.name().to_string();
        let options = self.options;

        let joined = tokio::task::spawn_blocking(move || {
            let mut stage = ItemStage::Queued;
            let result = convert_single(&handle, &options, &mut stage);
            (stage, result)
        })
        .await;

        let error = match joined {
            Ok((_, Ok(outcome))) => return outcome,
            Ok((stage, Err(e))) => {
                debug!("'{}' failed during {:?}", name, stage);
                e
            }
            Err(e) => ConverterError::invariant(format!("Item processing panicked: {e}")),
        };

        ConversionOutcome::Failure {
            original_name: name,
            reason: error.to_string(),
        }
    }

    /// Runs the batch on a spawned task and streams its events.
    ///
    /// The receiver yields a `Progress`/`Completed` pair per accepted item
    /// and closes when the batch ends. A superseded batch ends with a single
    /// `Superseded` event. Must be called from within a Tokio runtime.
    pub fn spawn_events<H: RawImageHandle>(
        self,
        images: Vec<H>,
    ) -> mpsc::UnboundedReceiver<BatchEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let complete_tx = tx.clone();

            let result = self
                .run(
                    images,
                    move |progress| {
                        let _ = progress_tx.send(BatchEvent::Progress(progress.clone()));
                    },
                    move |outcome| {
                        let _ = complete_tx.send(BatchEvent::Completed(outcome.clone()));
                    },
                )
                .await;

            if let Err(ConverterError::Superseded) = result {
                let _ = tx.send(BatchEvent::Superseded);
            }
        });

        rx
    }
}
