//! Source images and the handles the shell supplies for them.

use std::io::Cursor;

use image::{GenericImageView, ImageReader};
use tracing::debug;

use crate::utils::{ConverterError, ConverterResult, is_image_media_type, media_type_from_name};

/// Largest header-declared pixel count accepted before a full decode (100 MP).
pub const MAX_DECODED_PIXELS: u64 = 100_000_000;

/// A decoded image, owned by the pipeline step processing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    /// Size of the encoded input in bytes
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

/// An input supplied by the shell (file picker, drag and drop, CLI argument).
///
/// Decoding is deferred until the orchestrator reaches the item, so a batch
/// only ever holds one decoded image at a time.
pub trait RawImageHandle: Send + 'static {
    /// Display name, usually the file name
    fn name(&self) -> &str;

    /// Size of the encoded input in bytes
    fn byte_size(&self) -> u64;

    /// Declared media type, e.g. `image/png`
    fn media_type(&self) -> &str;

    /// Materializes RGBA pixels and dimensions.
    fn decode(&self) -> ConverterResult<SourceImage>;

    /// Whether the declared media type admits this input into a batch.
    fn is_image(&self) -> bool {
        is_image_media_type(self.media_type())
    }
}

/// A handle over bytes already held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryImage {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl InMemoryImage {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Creates a handle whose media type is guessed from the name's extension.
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = media_type_from_name(&name).to_string();
        Self { name, media_type, bytes }
    }
}

impl RawImageHandle for InMemoryImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn decode(&self) -> ConverterResult<SourceImage> {
        decode_rgba(&self.name, &self.bytes)
    }
}

/// Decodes encoded image bytes into an RGBA [`SourceImage`].
///
/// The header is inspected first so oversized inputs are rejected before
/// the full decode allocates.
pub fn decode_rgba(name: &str, bytes: &[u8]) -> ConverterResult<SourceImage> {
    let (header_width, header_height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConverterError::decode(format!("Cannot read '{name}': {e}")))?
        .into_dimensions()
        .map_err(|e| ConverterError::decode(format!("Unrecognized image '{name}': {e}")))?;

    let pixels = header_width as u64 * header_height as u64;
    if pixels > MAX_DECODED_PIXELS {
        return Err(ConverterError::decode(format!(
            "'{name}' is too large: {pixels} pixels (limit: {MAX_DECODED_PIXELS})"
        )));
    }

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConverterError::decode(format!("Cannot read '{name}': {e}")))?
        .decode()
        .map_err(|e| ConverterError::decode(format!("Failed to decode '{name}': {e}")))?;

    let (width, height) = image.dimensions();
    debug!("Decoded '{}': {}×{}", name, width, height);

    Ok(SourceImage {
        name: name.to_string(),
        byte_size: bytes.len() as u64,
        width,
        height,
        pixels: image.into_rgba8().into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let bytes = png_bytes(3, 2);
        let handle = InMemoryImage::new("tiny.png", "image/png", bytes.clone());
        let source = handle.decode().unwrap();

        assert_eq!((source.width, source.height), (3, 2));
        assert_eq!(source.pixels.len(), 3 * 2 * 4);
        assert_eq!(&source.pixels[..4], &[10, 20, 30, 128]);
        assert_eq!(source.byte_size, bytes.len() as u64);
        assert_eq!(source.name, "tiny.png");
    }

    #[test]
    fn garbage_fails_with_decode_error() {
        let bytes = b"definitely not a jpeg".to_vec();
        let handle = InMemoryImage::new("broken.jpg", "image/jpeg", bytes);
        assert!(matches!(handle.decode(), Err(ConverterError::Decode(_))));
    }

    #[test]
    fn media_type_gates_admission() {
        assert!(InMemoryImage::new("a.png", "image/png", vec![]).is_image());
        assert!(!InMemoryImage::new("notes.txt", "text/plain", vec![]).is_image());
        assert!(InMemoryImage::from_named_bytes("photo.JPG", vec![]).is_image());
        assert!(!InMemoryImage::from_named_bytes("archive.zip", vec![]).is_image());
    }
}
