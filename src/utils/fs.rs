//! Filesystem helpers for the command line shell.
//!
//! The conversion core never calls into this module; it only receives
//! [`InMemoryImage`] handles and hands back encoded bytes.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::InMemoryImage;
use crate::utils::{ConverterError, ConverterResult};

/// Get the final path component as a display name
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Reads a file into a handle named after it, media type guessed from the extension.
pub async fn read_input(path: impl AsRef<Path>) -> ConverterResult<InMemoryImage> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .await
        .map_err(|e| ConverterError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(InMemoryImage::from_named_bytes(extract_filename(path), bytes))
}

/// Writes converted bytes to `dir/name`, creating `dir` if needed.
pub async fn write_output(
    dir: impl AsRef<Path>,
    name: &str,
    bytes: &[u8],
) -> ConverterResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| ConverterError::Io(format!("Cannot write {}: {}", path.display(), e)))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawImageHandle;

    #[tokio::test]
    async fn reads_input_with_guessed_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.PNG");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let handle = read_input(&path).await.unwrap();
        assert_eq!(handle.name(), "cover.PNG");
        assert_eq!(handle.media_type(), "image/png");
        assert_eq!(handle.byte_size(), 4);
    }

    #[tokio::test]
    async fn missing_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(dir.path().join("gone.jpg")).await.unwrap_err();
        assert!(matches!(err, ConverterError::Io(_)));
    }

    #[tokio::test]
    async fn writes_output_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let written = write_output(&out_dir, "a_1280w_q75.webp", b"RIFF").await.unwrap();
        assert_eq!(written, out_dir.join("a_1280w_q75.webp"));
        assert_eq!(std::fs::read(written).unwrap(), b"RIFF");
    }
}
