//! Uploaded files attached to a form submission.

use std::path::Path;

/// Default upper bound for an uploaded rules file (50 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// A file submitted with a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub name: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The size of the file content in bytes.
    pub size: usize,
    /// The raw file content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Creates an uploaded file, guessing its content type from the extension.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).to_string();
        Self {
            size: content.len(),
            name,
            content_type,
            content,
        }
    }

    /// Returns the lowercased extension, handling `.tar.gz` as one extension.
    pub fn extension(&self) -> Option<String> {
        let lower = self.name.to_lowercase();
        if lower.ends_with(".tar.gz") {
            return Some("tar.gz".to_string());
        }
        Path::new(&lower)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }
}

fn guess_content_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        "application/gzip"
    } else if lower.ends_with(".tar") {
        "application/x-tar"
    } else if lower.ends_with(".rules") || lower.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_size_and_type() {
        let f = UploadedFile::new("emerging.rules", b"alert ip any any -> any any".to_vec());
        assert_eq!(f.size, 27);
        assert_eq!(f.content_type, "text/plain");
        assert_eq!(f.extension().as_deref(), Some("rules"));
    }

    #[test]
    fn test_tar_gz_extension() {
        let f = UploadedFile::new("ET-Open.TAR.GZ", Vec::new());
        assert_eq!(f.extension().as_deref(), Some("tar.gz"));
        assert_eq!(f.content_type, "application/gzip");
    }

    #[test]
    fn test_no_extension() {
        let f = UploadedFile::new("README", Vec::new());
        assert_eq!(f.extension(), None);
        assert_eq!(f.content_type, "application/octet-stream");
    }
}
