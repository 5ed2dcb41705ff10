//! Image attachment selected for a new todo

use std::fmt;

/// A local file picked by the user, held in memory until submit.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    /// Wrap file bytes, guessing the content type from the file name.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_raw()
            .map(str::to_string);
        Self {
            file_name,
            bytes,
            content_type,
        }
    }

    /// Content type to send with the upload.
    #[must_use]
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("application/octet-stream")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Build the object path for an upload: `{folder}/{timestamp_ms}.{ext}`.
///
/// The extension is whatever follows the last `.` in the file name (the whole
/// name when there is no dot), reduced to lowercase ASCII alphanumerics.
#[must_use]
pub fn storage_path_for(folder: &str, file_name: &str, timestamp_ms: i64) -> String {
    let raw_ext = file_name
        .trim()
        .rsplit('.')
        .next()
        .unwrap_or_default();
    let ext: String = raw_ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .flat_map(|ch| ch.to_lowercase())
        .collect();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };

    let folder = folder.trim().trim_matches('/');
    if folder.is_empty() {
        format!("{timestamp_ms}.{ext}")
    } else {
        format!("{folder}/{timestamp_ms}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn storage_path_uses_timestamp_and_extension() {
        assert_eq!(
            storage_path_for("todo-images", "Cat Photo.JPG", 1_700_000_000_123),
            "todo-images/1700000000123.jpg"
        );
    }

    #[test]
    fn storage_path_uses_last_extension_only() {
        assert_eq!(
            storage_path_for("todo-images/", "archive.tar.gz", 5),
            "todo-images/5.gz"
        );
    }

    #[test]
    fn storage_path_without_dot_uses_whole_name() {
        assert_eq!(storage_path_for("imgs", "README", 9), "imgs/9.readme");
        assert_eq!(storage_path_for("", "...", 9), "9.bin");
    }

    #[test]
    fn image_upload_guesses_content_type() {
        let upload = ImageUpload::new("photo.png", vec![1, 2, 3]);
        assert_eq!(upload.content_type.as_deref(), Some("image/png"));
        assert_eq!(upload.len(), 3);

        let unknown = ImageUpload::new("blob", Vec::new());
        assert_eq!(unknown.content_type_or_default(), "application/octet-stream");
        assert!(unknown.is_empty());
    }

    #[test]
    fn image_upload_debug_hides_bytes() {
        let upload = ImageUpload::new("photo.png", vec![0xAB; 64]);
        let rendered = format!("{upload:?}");
        assert!(rendered.contains("64 bytes"));
        assert!(!rendered.contains("171"));
    }
}
