//! Core types and state.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ConversionOptions`]: Per-batch settings (max width, quality)
//! - [`SourceImage`] / [`RawImageHandle`]: Inputs and their decoded form
//! - [`ConversionOutcome`]: Result of one item
//! - [`BatchProgress`] / [`BatchEvent`]: Progress tracking for batch operations
//! - [`ConverterState`]: Last-submit-wins bookkeeping for the shell

mod state;
mod types;
mod task;
mod progress;

pub use state::{BatchTicket, ConverterState};
pub use types::{
    BatchSummary, ConversionOptions, ConversionOutcome, MaxWidth, TargetDimensions,
    DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
};
pub use task::{InMemoryImage, RawImageHandle, SourceImage, decode_rgba, MAX_DECODED_PIXELS};
pub use progress::{BatchEvent, BatchProgress};
