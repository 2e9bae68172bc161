//! Reads image files for the chat, with pre-flight checks

use groupchat_domain::ImageData;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Largest image accepted (20 MiB, the chat completions payload limit)
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Image file is empty: {0}")]
    Empty(PathBuf),

    #[error("Image file is too large: {path} ({size} bytes, limit {limit})")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads an image from disk and infers its MIME type from the extension
#[derive(Debug, Clone)]
pub struct ImageLoader {
    max_bytes: u64,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub async fn load(&self, path: impl AsRef<Path>) -> Result<ImageData, ImageError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ImageError::NotFound(path.to_path_buf())
            } else {
                ImageError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        if !metadata.is_file() {
            return Err(ImageError::NotAFile(path.to_path_buf()));
        }
        self.check_size(path, metadata.len())?;

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        // The file may have changed between stat and read
        self.check_size(path, bytes.len() as u64)?;

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy())
            .unwrap_or_default();
        let image = ImageData::from_extension(bytes, &extension);
        debug!(
            "Loaded image {} ({} bytes, {})",
            path.display(),
            image.len(),
            image.mime_type()
        );
        Ok(image)
    }

    fn check_size(&self, path: &Path, size: u64) -> Result<(), ImageError> {
        if size == 0 {
            return Err(ImageError::Empty(path.to_path_buf()));
        }
        if size > self.max_bytes {
            return Err(ImageError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_png_with_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowchart.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = ImageLoader::new().load(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_extension_defaults_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.heic");
        std::fs::write(&path, [1, 2, 3]).unwrap();
        let image = ImageLoader::new().load(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");

        let path = dir.path().join("noext");
        std::fs::write(&path, [1]).unwrap();
        let image = ImageLoader::new().load(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageLoader::new()
            .load(dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ImageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageLoader::new().load(dir.path()).await.unwrap_err();
        assert!(matches!(err, ImageError::NotAFile(_)));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        let err = ImageLoader::new().load(&path).await.unwrap_err();
        assert!(matches!(err, ImageError::Empty(_)));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.gif");
        std::fs::write(&path, vec![0u8; 11]).unwrap();

        let err = ImageLoader::new()
            .with_max_bytes(10)
            .load(&path)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ImageError::TooLarge {
                size: 11,
                limit: 10,
                ..
            }
        ));
    }
}
