//! Typed wrapper over the document endpoints
//!
//! Uploads are multipart: a `file` part carrying the bytes with the
//! original file name and guessed MIME type, plus a `chatId` text part
//! only when the upload is tagged with a conversation. Only images and
//! PDFs are accepted; the filter runs before anything touches the
//! network. The client never polls for processing completion - it only
//! confirms the upload was accepted.

use shared::{Document, DocumentData, DocumentsData};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{ApiClient, ApiError};

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "pdf",
];

/// Failure of an upload, including the pre-network guards.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported file type (images and PDFs only)")]
    Unsupported,

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UploadError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, UploadError::Api(err) if err.is_session_expired())
    }
}

/// Whether the scanner output at `path` is something the pipeline takes.
/// Extension filtering only, not content validation.
pub fn is_supported_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// The multipart fields an upload will carry: file name, MIME type, and
/// the chat tag when one applies.
fn upload_parts(path: &Path, chat_id: Option<&str>) -> (String, String, Option<String>) {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    (file_name, mime, chat_id.map(String::from))
}

#[derive(Clone)]
pub struct DocumentClient {
    api: Arc<ApiClient>,
}

impl DocumentClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Document>, ApiError> {
        let data: DocumentsData = self.api.get("/api/documents").await?;
        Ok(data.documents)
    }

    pub async fn get(&self, id: &str) -> Result<Document, ApiError> {
        let data: DocumentData = self.api.get(&format!("/api/documents/{id}")).await?;
        Ok(data.document)
    }

    /// Upload one file, optionally tagged with the chat it belongs to.
    pub async fn upload(&self, path: &Path, chat_id: Option<&str>) -> Result<Document, UploadError> {
        if !is_supported_upload(path) {
            return Err(UploadError::Unsupported);
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (file_name, mime, chat_field) = upload_parts(path, chat_id);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(ApiError::from)?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(chat_id) = chat_field {
            form = form.text("chatId", chat_id);
        }

        let data: DocumentData = self.api.post_multipart("/api/documents", form).await?;
        Ok(data.document)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/api/documents/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_upload(Path::new("fir.pdf")));
        assert!(is_supported_upload(Path::new("scan.JPG")));
        assert!(is_supported_upload(Path::new("page.jpeg")));
        assert!(is_supported_upload(Path::new("/tmp/witness.png")));
        assert!(!is_supported_upload(Path::new("notes.docx")));
        assert!(!is_supported_upload(Path::new("archive.zip")));
        assert!(!is_supported_upload(Path::new("no-extension")));
    }

    #[test]
    fn test_upload_parts_without_chat() {
        let (file_name, mime, chat) = upload_parts(Path::new("/scans/fir.pdf"), None);
        assert_eq!(file_name, "fir.pdf");
        assert_eq!(mime, "application/pdf");
        assert_eq!(chat, None);
    }

    #[test]
    fn test_upload_parts_with_chat_tag() {
        let (file_name, mime, chat) = upload_parts(Path::new("statement.jpg"), Some("c1"));
        assert_eq!(file_name, "statement.jpg");
        assert_eq!(mime, "image/jpeg");
        assert_eq!(chat.as_deref(), Some("c1"));
    }
}
