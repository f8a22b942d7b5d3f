//! Core types for conversion options and per-item outcomes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quality used when none is supplied.
pub const DEFAULT_QUALITY: u32 = 75;
/// Maximum width used when none is supplied.
pub const DEFAULT_MAX_WIDTH: u32 = 1280;

/// Requested maximum output width.
///
/// Serializes as a plain integer or the string `"original"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MaxWidthRepr", into = "MaxWidthRepr")]
pub enum MaxWidth {
    /// Downscale anything wider than this many pixels
    Pixels(u32),
    /// Keep source dimensions
    Original,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MaxWidthRepr {
    Pixels(u32),
    Keyword(String),
}

impl TryFrom<MaxWidthRepr> for MaxWidth {
    type Error = String;

    fn try_from(repr: MaxWidthRepr) -> Result<Self, Self::Error> {
        match repr {
            MaxWidthRepr::Pixels(px) => Ok(Self::Pixels(px)),
            MaxWidthRepr::Keyword(word) => word.parse(),
        }
    }
}

impl From<MaxWidth> for MaxWidthRepr {
    fn from(width: MaxWidth) -> Self {
        match width {
            MaxWidth::Pixels(px) => Self::Pixels(px),
            MaxWidth::Original => Self::Keyword("original".to_string()),
        }
    }
}

impl FromStr for MaxWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("original") {
            return Ok(Self::Original);
        }
        s.parse::<u32>()
            .map(Self::Pixels)
            .map_err(|_| format!("expected a pixel width or \"original\", got {s:?}"))
    }
}

impl fmt::Display for MaxWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Original => f.write_str("original"),
        }
    }
}

/// Settings shared read-only by every item of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Maximum output width, or `original` to keep the source size
    pub max_width: MaxWidth,
    /// Lossy quality (1-100); higher favours fidelity over size
    pub quality: u32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_width: MaxWidth::Pixels(DEFAULT_MAX_WIDTH),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Output dimensions derived for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width: u32,
    pub height: u32,
}

impl TargetDimensions {
    /// Expected RGBA buffer length, `None` on overflow.
    pub fn rgba_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
    }
}

impl fmt::Display for TargetDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Result of pushing one image through the pipeline.
///
/// Encoded bytes exist only on success. They are not serialized; the shell
/// persists them separately under `new_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ConversionOutcome {
    Success {
        original_name: String,
        new_name: String,
        original_byte_size: u64,
        encoded_byte_size: u64,
        target_dimensions: TargetDimensions,
        #[serde(skip)]
        encoded_bytes: Vec<u8>,
    },
    Failure {
        original_name: String,
        reason: String,
    },
}

impl ConversionOutcome {
    pub fn original_name(&self) -> &str {
        match self {
            Self::Success { original_name, .. } | Self::Failure { original_name, .. } => {
                original_name
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn encoded_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Success { encoded_bytes, .. } => Some(encoded_bytes.as_slice()),
            Self::Failure { .. } => None,
        }
    }

    /// Bytes saved by the conversion (negative if the file grew).
    pub fn saved_bytes(&self) -> Option<i64> {
        match self {
            Self::Success { original_byte_size, encoded_byte_size, .. } => {
                Some(*original_byte_size as i64 - *encoded_byte_size as i64)
            }
            Self::Failure { .. } => None,
        }
    }

    /// Saved bytes as a percentage of the original size.
    pub fn compression_ratio(&self) -> Option<f64> {
        match self {
            Self::Success { original_byte_size, encoded_byte_size, .. } => {
                Some(ratio(*original_byte_size, *encoded_byte_size))
            }
            Self::Failure { .. } => None,
        }
    }

    /// `round((1 - encoded / original) * 100)`, the figure shown next to each result.
    pub fn reduction_percent(&self) -> Option<i64> {
        self.compression_ratio().map(|r| r.round() as i64)
    }
}

fn ratio(original: u64, encoded: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - encoded as f64 / original as f64) * 100.0
}

/// Aggregate statistics over one finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Number of outcomes (accepted image inputs)
    #[serde(rename = "imageCount")]
    pub image_count: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Original bytes of the successful items
    #[serde(rename = "totalOriginalBytes")]
    pub total_original_bytes: u64,
    /// Encoded bytes of the successful items
    #[serde(rename = "totalEncodedBytes")]
    pub total_encoded_bytes: u64,
    #[serde(rename = "savedBytes")]
    pub saved_bytes: i64,
    #[serde(rename = "compressionRatio")]
    pub compression_ratio: f64,
    #[serde(rename = "totalTimeMs")]
    pub total_time_ms: u64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome], elapsed: Duration) -> Self {
        let mut summary = Self {
            image_count: outcomes.len(),
            succeeded: 0,
            failed: 0,
            total_original_bytes: 0,
            total_encoded_bytes: 0,
            saved_bytes: 0,
            compression_ratio: 0.0,
            total_time_ms: elapsed.as_millis() as u64,
        };

        for outcome in outcomes {
            match outcome {
                ConversionOutcome::Success { original_byte_size, encoded_byte_size, .. } => {
                    summary.succeeded += 1;
                    summary.total_original_bytes += original_byte_size;
                    summary.total_encoded_bytes += encoded_byte_size;
                }
                ConversionOutcome::Failure { .. } => summary.failed += 1,
            }
        }

        let (original, encoded) = (summary.total_original_bytes, summary.total_encoded_bytes);
        summary.saved_bytes = original as i64 - encoded as i64;
        summary.compression_ratio = ratio(original, encoded);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(original: u64, encoded: u64) -> ConversionOutcome {
        ConversionOutcome::Success {
            original_name: "a.png".into(),
            new_name: "a_1280w_q75.webp".into(),
            original_byte_size: original,
            encoded_byte_size: encoded,
            target_dimensions: TargetDimensions { width: 10, height: 10 },
            encoded_bytes: vec![0; encoded as usize],
        }
    }

    #[test]
    fn max_width_accepts_number_or_original() {
        let opts: ConversionOptions =
            serde_json::from_str(r#"{"maxWidth": "original", "quality": 30}"#).unwrap();
        assert_eq!(opts.max_width, MaxWidth::Original);
        assert_eq!(opts.quality, 30);

        let opts: ConversionOptions =
            serde_json::from_str(r#"{"maxWidth": 1280, "quality": 75}"#).unwrap();
        assert_eq!(opts.max_width, MaxWidth::Pixels(1280));

        let unknown = r#"{"maxWidth": "wide", "quality": 75}"#;
        assert!(serde_json::from_str::<ConversionOptions>(unknown).is_err());
    }

    #[test]
    fn max_width_serializes_back_to_its_wire_form() {
        assert_eq!(serde_json::to_string(&MaxWidth::Original).unwrap(), r#""original""#);
        assert_eq!(serde_json::to_string(&MaxWidth::Pixels(640)).unwrap(), "640");
    }

    #[test]
    fn max_width_parses_from_cli_text() {
        assert_eq!("Original".parse::<MaxWidth>(), Ok(MaxWidth::Original));
        assert_eq!("800".parse::<MaxWidth>(), Ok(MaxWidth::Pixels(800)));
        assert!("-5".parse::<MaxWidth>().is_err());
    }

    #[test]
    fn statistics_only_exist_on_success() {
        let ok = success(1000, 250);
        assert_eq!(ok.saved_bytes(), Some(750));
        assert_eq!(ok.reduction_percent(), Some(75));
        assert_eq!(ok.encoded_bytes().map(<[u8]>::len), Some(250));

        let failed = ConversionOutcome::Failure {
            original_name: "b.jpg".into(),
            reason: "Decode error: truncated".into(),
        };
        assert_eq!(failed.saved_bytes(), None);
        assert_eq!(failed.encoded_bytes(), None);
        assert_eq!(failed.original_name(), "b.jpg");
    }

    #[test]
    fn growth_reports_negative_reduction() {
        let grew = success(100, 150);
        assert_eq!(grew.saved_bytes(), Some(-50));
        assert_eq!(grew.reduction_percent(), Some(-50));
    }

    #[test]
    fn summary_counts_only_successful_bytes() {
        let outcomes = vec![
            success(1000, 400),
            ConversionOutcome::Failure { original_name: "x".into(), reason: "bad".into() },
            success(1000, 600),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes, Duration::from_millis(42));
        assert_eq!(summary.image_count, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_original_bytes, 2000);
        assert_eq!(summary.total_encoded_bytes, 1000);
        assert_eq!(summary.saved_bytes, 1000);
        assert!((summary.compression_ratio - 50.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_time_ms, 42);
    }

    #[test]
    fn outcome_serializes_without_payload() {
        let json = serde_json::to_value(success(10, 5)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["newName"], "a_1280w_q75.webp");
        assert!(json.get("encodedBytes").is_none());
    }
}
