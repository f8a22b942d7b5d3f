use crate::core::{ConversionOptions, MaxWidth};
use crate::utils::ConfigError;

/// Validates batch options before any item is processed.
pub fn validate_options(options: &ConversionOptions) -> Result<(), ConfigError> {
    if options.quality == 0 || options.quality > 100 {
        return Err(ConfigError::QualityOutOfRange(options.quality));
    }

    if let MaxWidth::Pixels(0) = options.max_width {
        return Err(ConfigError::InvalidMaxWidth(0));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(max_width: MaxWidth, quality: u32) -> ConversionOptions {
        ConversionOptions { max_width, quality }
    }

    #[test]
    fn accepts_quality_bounds() {
        assert!(validate_options(&options(MaxWidth::Pixels(1280), 1)).is_ok());
        assert!(validate_options(&options(MaxWidth::Original, 100)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_quality() {
        assert_eq!(
            validate_options(&options(MaxWidth::Pixels(1280), 101)),
            Err(ConfigError::QualityOutOfRange(101))
        );
        assert_eq!(
            validate_options(&options(MaxWidth::Original, 0)),
            Err(ConfigError::QualityOutOfRange(0))
        );
    }

    #[test]
    fn rejects_zero_width() {
        assert_eq!(
            validate_options(&options(MaxWidth::Pixels(0), 75)),
            Err(ConfigError::InvalidMaxWidth(0))
        );
    }
}
