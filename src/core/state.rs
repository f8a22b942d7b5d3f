//! Batch supersession state owned by the shell.
//!
//! The shell keeps one [`ConverterState`] for as long as it accepts batches.
//! Every submission takes a fresh [`BatchTicket`]; taking a ticket makes all
//! earlier tickets stale, so the newest submission wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::core::ConversionOptions;
use crate::processing::BatchProcessor;
use crate::utils::ConverterResult;

/// Hands out batch tickets; cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct ConverterState {
    generation: Arc<AtomicU64>,
}

/// Marks one submitted batch. Stale once a newer ticket is issued.
#[derive(Debug, Clone)]
pub struct BatchTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new batch, superseding any batch in flight.
    pub fn begin_batch(&self) -> BatchTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("Batch generation {} submitted", generation);
        BatchTicket {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Validates `options` and returns a processor bound to a fresh ticket.
    ///
    /// Options are validated before the ticket is taken, so a rejected
    /// submission leaves the batch in flight untouched.
    pub fn submit(&self, options: ConversionOptions) -> ConverterResult<BatchProcessor> {
        let processor = BatchProcessor::new(options)?;
        Ok(processor.with_ticket(self.begin_batch()))
    }
}

impl BatchTicket {
    /// `false` once a newer batch has been submitted.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let state = ConverterState::new();
        let first = state.begin_batch();
        assert!(first.is_current());

        let second = state.begin_batch();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn rejected_submission_keeps_current_batch() {
        let state = ConverterState::new();
        let running = state.begin_batch();

        let bad = ConversionOptions { quality: 0, ..ConversionOptions::default() };
        assert!(state.submit(bad).is_err());
        assert!(running.is_current());
    }
}
