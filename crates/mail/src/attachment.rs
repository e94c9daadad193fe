use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::MailerError;

/// Content type used for attachments built from raw content.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// File name used for attachments built from raw content.
pub const DEFAULT_FILE_NAME: &str = "attachment.txt";

/// A file attached to (or embedded in) a message, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME content type (e.g. `"application/pdf"`).
    pub content_type: String,
    /// File name presented to the recipient.
    pub filename: String,
    /// Base64-encoded file content.
    pub content_base64: String,
}

/// Overrides for the inferred content type and file name.
#[derive(Debug, Clone, Default)]
pub struct AttachmentOptions {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AttachmentOptions {
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

impl Attachment {
    /// Read a file and encode it.
    ///
    /// The content type is guessed from the extension and the file name is
    /// the path's final component, unless `options` override either.
    pub fn from_path(path: impl AsRef<Path>, options: AttachmentOptions) -> Result<Self, MailerError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| MailerError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let content_type = options
            .content_type
            .unwrap_or_else(|| content_type_for(path).to_owned());
        let filename = options.file_name.unwrap_or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(Self {
            content_type,
            filename,
            content_base64: STANDARD.encode(content),
        })
    }

    /// Encode content supplied directly.
    pub fn from_content(content: impl AsRef<[u8]>, options: AttachmentOptions) -> Self {
        Self {
            content_type: options
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            filename: options
                .file_name
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned()),
            content_base64: STANDARD.encode(content),
        }
    }
}

/// Guess a MIME type from a file extension.
///
/// Unknown or missing extensions map to `application/octet-stream`.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("txt" | "log") => "text/plain",
        Some("htm" | "html") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("ics") => "text/calendar",
        Some("xml") => "application/xml",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_file(name: &str, content: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("relay-mail-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn from_content_uses_defaults() {
        let attachment = Attachment::from_content("Hello World", AttachmentOptions::default());
        assert_eq!(attachment.content_type, "text/plain");
        assert_eq!(attachment.filename, "attachment.txt");
        assert_eq!(attachment.content_base64, "SGVsbG8gV29ybGQ=");
    }

    #[test]
    fn from_content_honors_overrides() {
        let options = AttachmentOptions::default()
            .with_content_type("text/csv")
            .with_file_name("report.csv");
        let attachment = Attachment::from_content("a,b\n", options);
        assert_eq!(attachment.content_type, "text/csv");
        assert_eq!(attachment.filename, "report.csv");
    }

    #[test]
    fn from_path_infers_type_and_name() {
        let path = scratch_file("logo.png", b"\x89PNG");
        let attachment = Attachment::from_path(&path, AttachmentOptions::default()).unwrap();
        assert_eq!(attachment.content_type, "image/png");
        assert_eq!(attachment.filename, "logo.png");
        assert_eq!(attachment.content_base64, STANDARD.encode(b"\x89PNG"));
    }

    #[test]
    fn from_path_honors_overrides() {
        let path = scratch_file("invoice.bin", b"data");
        let options = AttachmentOptions::default()
            .with_content_type("application/pdf")
            .with_file_name("invoice.pdf");
        let attachment = Attachment::from_path(&path, options).unwrap();
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.filename, "invoice.pdf");
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let err = Attachment::from_path("/nonexistent/relay/file.pdf", AttachmentOptions::default())
            .unwrap_err();
        assert!(matches!(err, MailerError::Io { .. }));
    }

    #[test]
    fn content_type_guessing() {
        assert_eq!(content_type_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("x.unknown")), "application/octet-stream");
    }
}
