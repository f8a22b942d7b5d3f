// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use self::core::{
    BatchEvent, BatchProgress, BatchSummary, ConversionOptions, ConversionOutcome, ConverterState,
    InMemoryImage, MaxWidth, RawImageHandle, SourceImage, TargetDimensions,
};
pub use processing::BatchProcessor;
pub use utils::{ConfigError, ConverterError, ConverterResult};
pub use commands::*;

// The command line shell lives in main.rs; everything it needs is re-exported here.
