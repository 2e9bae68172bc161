//! Image payloads attached to messages

/// MIME type used when a file extension is not recognised.
///
/// Unknown extensions fall back to JPEG instead of failing; this is a
/// lenient default, not a detected format.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Map a file extension to an image MIME type.
///
/// Matching is case-insensitive and a leading `.` is accepted, so
/// `".PNG"`, `"png"` and `"Png"` all map to `image/png`.
///
/// ```
/// use groupchat_domain::conversation::image::mime_type_for_extension;
///
/// assert_eq!(mime_type_for_extension("jpg"), "image/jpeg");
/// assert_eq!(mime_type_for_extension(".TIF"), "image/tiff");
/// assert_eq!(mime_type_for_extension("heic"), "image/jpeg");
/// ```
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tiff" | "tif" => "image/tiff",
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// Raw image bytes plus their MIME type (Value Object)
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Build from bytes, deriving the MIME type from a file extension
    pub fn from_extension(bytes: Vec<u8>, extension: &str) -> Self {
        Self::new(bytes, mime_type_for_extension(extension))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Image payloads can be megabytes; keep Debug output to a summary.
impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognised_extensions() {
        assert_eq!(mime_type_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_type_for_extension("png"), "image/png");
        assert_eq!(mime_type_for_extension("gif"), "image/gif");
        assert_eq!(mime_type_for_extension("bmp"), "image/bmp");
        assert_eq!(mime_type_for_extension("webp"), "image/webp");
        assert_eq!(mime_type_for_extension("tiff"), "image/tiff");
        assert_eq!(mime_type_for_extension("tif"), "image/tiff");
    }

    #[test]
    fn test_extension_case_and_dot() {
        assert_eq!(mime_type_for_extension(".PNG"), "image/png");
        assert_eq!(mime_type_for_extension("WebP"), "image/webp");
    }

    #[test]
    fn test_unknown_extension_defaults_to_jpeg() {
        assert_eq!(mime_type_for_extension("heic"), DEFAULT_IMAGE_MIME);
        assert_eq!(mime_type_for_extension(""), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn test_debug_hides_bytes() {
        let image = ImageData::new(vec![0u8; 4096], "image/png");
        let debug = format!("{:?}", image);
        assert!(debug.contains("4096"));
        assert!(!debug.contains("0, 0, 0"));
    }
}
