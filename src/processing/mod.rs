//! The conversion pipeline.
//!
//! # Architecture
//!
//! - [`resize`]: Resize planning (never upscales) and Lanczos3 resampling.
//! - [`formats`]: Lossy WebP encoding at a requested quality.
//! - [`executor`]: One item through decode → plan → resample → encode.
//! - [`BatchProcessor`]: Sequential, failure-isolating batch orchestration.

pub mod batch;
pub mod executor;
pub mod formats;
pub mod resize;

pub use batch::BatchProcessor;
pub use executor::{ItemStage, convert_single};
pub use formats::{MAX_WEBP_DIMENSION, encode_webp};
pub use resize::{plan, resample};
