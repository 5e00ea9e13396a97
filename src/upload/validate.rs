//! File acceptance policy, checked before anything touches the network.
//!
//! Pure function of the file's declared metadata. Contents are never
//! inspected; the server re-validates on its side.

use thiserror::Error;

pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 14] = [
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png", "gif", "txt", "zip",
    "rar",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File \"{0}\" exceeds 50MB limit")]
    TooLarge(String),
    #[error("Video files are not allowed: \"{0}\"")]
    VideoNotAllowed(String),
    #[error("File type not allowed: \"{name}\". Allowed: {allowed}")]
    TypeNotAllowed { name: String, allowed: String },
}

/// Checks a candidate file, first failure wins: size, then MIME type, then
/// extension allow-list.
pub fn validate(name: &str, byte_size: u64, mime_type: &str) -> Result<(), ValidationError> {
    if byte_size > MAX_FILE_BYTES {
        return Err(ValidationError::TooLarge(name.to_string()));
    }

    if mime_type.starts_with("video/") {
        return Err(ValidationError::VideoNotAllowed(name.to_string()));
    }

    // Extension is whatever follows the last dot; a file with no dot fails
    // the allow-list check like any other unknown type.
    let extension = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        let allowed = ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationError::TypeNotAllowed {
            name: name.to_string(),
            allowed,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_file_regardless_of_type() {
        let result = validate("thesis.pdf", MAX_FILE_BYTES + 1, "application/pdf");
        assert_eq!(result, Err(ValidationError::TooLarge("thesis.pdf".into())));
    }

    #[test]
    fn accepts_file_exactly_at_the_limit() {
        assert!(validate("thesis.pdf", MAX_FILE_BYTES, "application/pdf").is_ok());
    }

    #[test]
    fn rejects_video_even_with_allowed_extension() {
        let result = validate("clip.gif", 100, "video/mp4");
        assert_eq!(result, Err(ValidationError::VideoNotAllowed("clip.gif".into())));
    }

    #[test]
    fn rejects_disallowed_extension_and_names_the_allow_list() {
        match validate("payload.exe", 100, "application/octet-stream") {
            Err(ValidationError::TypeNotAllowed { name, allowed }) => {
                assert_eq!(name, "payload.exe");
                assert!(allowed.contains(".pdf"));
                assert!(allowed.contains(".rar"));
            }
            other => panic!("expected TypeNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(validate("SCAN.PDF", 100, "application/pdf").is_ok());
        assert!(validate("photo.JPeG", 100, "image/jpeg").is_ok());
    }

    #[test]
    fn rejects_file_without_extension() {
        assert!(validate("README", 100, "text/plain").is_err());
    }

    #[test]
    fn accepts_every_allow_listed_extension() {
        for ext in ALLOWED_EXTENSIONS {
            let name = format!("file.{ext}");
            assert!(validate(&name, 1024, "application/octet-stream").is_ok(), "{name}");
        }
    }
}
