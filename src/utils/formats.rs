use std::path::Path;
use std::str::FromStr;

use crate::core::MaxWidth;
use crate::utils::ConverterError;

/// Media type reported for names without a recognised image extension.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Extension of every converted file.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Raster formats the shell recognises by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    JPEG,
    PNG,
    WebP,
    GIF,
    BMP,
    TIFF,
    AVIF,
}

impl ImageFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::JPEG => "image/jpeg",
            Self::PNG => "image/png",
            Self::WebP => "image/webp",
            Self::GIF => "image/gif",
            Self::BMP => "image/bmp",
            Self::TIFF => "image/tiff",
            Self::AVIF => "image/avif",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ConverterError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WebP),
            "gif" => Ok(Self::GIF),
            "bmp" => Ok(Self::BMP),
            "tif" | "tiff" => Ok(Self::TIFF),
            "avif" => Ok(Self::AVIF),
            _ => Err(ConverterError::decode(format!("Unsupported image format: {ext}"))),
        }
    }
}

/// Guesses a declared media type from a file name's extension.
pub fn media_type_from_name(name: &str) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| ImageFormat::from_str(ext).ok())
        .map_or(UNKNOWN_MEDIA_TYPE, |format| format.media_type())
}

/// Whether a declared media type belongs in a batch.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Strips the last extension from `name`, keeping dot-files intact.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => name,
    }
}

/// Suggested name for a converted file: `<stem>_<width>w_q<quality>.webp`.
///
/// The width token is the requested maximum, not the final width, so every
/// file of one batch carries the same suffix.
pub fn output_file_name(original_name: &str, max_width: MaxWidth, quality: u32) -> String {
    let stem = file_stem(original_name);
    match max_width {
        MaxWidth::Pixels(px) => format!("{stem}_{px}w_q{quality}.{OUTPUT_EXTENSION}"),
        MaxWidth::Original => format!("{stem}_original_q{quality}.{OUTPUT_EXTENSION}"),
    }
}

/// Formats a byte count as kilobytes with one decimal.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_media_type_from_extension() {
        assert_eq!(media_type_from_name("IMG_0001.JPG"), "image/jpeg");
        assert_eq!(media_type_from_name("scan.tiff"), "image/tiff");
        assert_eq!(media_type_from_name("readme.md"), UNKNOWN_MEDIA_TYPE);
        assert_eq!(media_type_from_name("no_extension"), UNKNOWN_MEDIA_TYPE);
    }

    #[test]
    fn image_media_types_are_case_insensitive() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("IMAGE/JPEG"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type("img"));
        assert!(!is_image_media_type(""));
    }

    #[test]
    fn output_names_carry_width_and_quality() {
        assert_eq!(
            output_file_name("holiday.photo.jpg", MaxWidth::Pixels(1280), 75),
            "holiday.photo_1280w_q75.webp"
        );
        assert_eq!(
            output_file_name("scan.png", MaxWidth::Original, 30),
            "scan_original_q30.webp"
        );
        assert_eq!(output_file_name(".hidden", MaxWidth::Pixels(640), 75), ".hidden_640w_q75.webp");
        assert_eq!(output_file_name("bare", MaxWidth::Pixels(640), 75), "bare_640w_q75.webp");
    }

    #[test]
    fn kilobytes_have_one_decimal() {
        assert_eq!(format_kb(1536), "1.5 KB");
        assert_eq!(format_kb(0), "0.0 KB");
    }
}
