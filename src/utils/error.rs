//! Error types for the converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! Only [`ConverterError::Configuration`] aborts a batch; every other variant is
//! captured into the failing item's outcome.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Invalid [`ConversionOptions`](crate::core::ConversionOptions), detected before any item runs.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigError {
    /// Quality outside `1..=100`
    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    QualityOutOfRange(u32),
    /// Numeric max width that is not positive
    #[error("Invalid max width: {0}. Must be a positive number of pixels or \"original\"")]
    InvalidMaxWidth(u32),
}

/// Main error type for the converter.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Conversion options were rejected; the whole batch is aborted
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Input bytes could not be interpreted as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// The codec rejected the pixel buffer
    #[error("Encode error: {0}")]
    Encode(String),

    /// Planner or resampler received malformed dimensions
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    /// A newer batch was submitted while this one was in flight
    #[error("Batch superseded by a newer submission")]
    Superseded,

    /// File IO error (shell helpers only; the core never touches the filesystem)
    #[error("IO error: {0}")]
    Io(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl ConverterError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn invariant<T: Into<String>>(msg: T) -> Self {
        Self::InternalInvariant(msg.into())
    }

    /// Whether this error stops the batch instead of failing a single item.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Superseded)
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_and_supersession_are_fatal() {
        assert!(ConverterError::from(ConfigError::QualityOutOfRange(101)).is_batch_fatal());
        assert!(ConverterError::Superseded.is_batch_fatal());
        assert!(!ConverterError::decode("bad header").is_batch_fatal());
        assert!(!ConverterError::encode("zero width").is_batch_fatal());
        assert!(!ConverterError::invariant("width 0").is_batch_fatal());
    }

    #[test]
    fn messages_carry_the_offending_value() {
        let err = ConverterError::from(ConfigError::QualityOutOfRange(101));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid quality value: 101. Must be between 1 and 100"
        );
        assert_eq!(ConverterError::decode("truncated").to_string(), "Decode error: truncated");
    }
}
