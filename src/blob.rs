//! Local-filesystem blob storage for admin uploads.
//!
//! Files are sniffed by magic bytes (the client's content type and extension
//! are not trusted), renamed to a fresh UUID and served by the static file
//! layer under `/uploads`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// URL path the upload directory is mounted at.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Largest body an upload request may carry.
pub const MAX_UPLOAD_SIZE: usize = MAX_DOCUMENT_SIZE;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Image,
    Document,
}

impl BlobKind {
    fn dir(self) -> &'static str {
        match self {
            BlobKind::Image => "images",
            BlobKind::Document => "documents",
        }
    }

    fn max_size(self) -> usize {
        match self {
            BlobKind::Image => MAX_IMAGE_SIZE,
            BlobKind::Document => MAX_DOCUMENT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

fn sniff(bytes: &[u8]) -> Option<(&'static str, &'static str, BlobKind)> {
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(("image/jpeg", "jpg", BlobKind::Image)),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(("image/png", "png", BlobKind::Image)),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some(("image/gif", "gif", BlobKind::Image)),
        // WebP: RIFF....WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
            Some(("image/webp", "webp", BlobKind::Image))
        }
        // PDF: %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => Some(("application/pdf", "pdf", BlobKind::Document)),
        _ => None,
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains('\\')
        && !segment.contains('\0')
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
    /// Origin prepended to returned URLs; empty for relative URLs.
    base_url: String,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates and writes an upload, returning its public URL.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredBlob> {
        let ext = original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::validation(
                "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF, PDF.",
            ));
        }
        if bytes.is_empty() {
            return Err(AppError::validation("Empty file"));
        }

        let (mime_type, ext, kind) = sniff(bytes).ok_or_else(|| {
            AppError::validation("File content does not match an allowed file type.")
        })?;
        if bytes.len() > kind.max_size() {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB.",
                kind.max_size() / (1024 * 1024)
            )));
        }

        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&filename), bytes).await?;

        let url = format!(
            "{}{PUBLIC_PREFIX}/{}/{filename}",
            self.base_url,
            kind.dir()
        );
        tracing::info!(url = %url, size = bytes.len(), "upload stored");

        Ok(StoredBlob {
            url,
            filename,
            size: bytes.len(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Removes the blob behind a URL previously returned by [`save`].
    /// `false` when the file no longer exists.
    ///
    /// [`save`]: BlobStore::save
    pub async fn delete(&self, url: &str) -> Result<bool> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(url = %url, "upload deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, url: &str) -> Result<PathBuf> {
        let url = url.trim();
        let local = url.strip_prefix(self.base_url.as_str()).unwrap_or(url);
        let relative = local
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| AppError::validation("Not an upload URL"))?;

        if !relative.split('/').all(is_safe_segment) {
            return Err(AppError::validation("Invalid filename"));
        }
        Ok(relative.split('/').fold(self.root.clone(), |p, s| p.join(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const PDF: &[u8] = b"%PDF-1.7\n%...";

    fn store(dir: &tempfile::TempDir) -> BlobStore {
        BlobStore::new(dir.path(), "")
    }

    #[test]
    fn test_sniff() {
        assert_eq!(sniff(PNG).map(|s| s.0), Some("image/png"));
        assert_eq!(sniff(PDF).map(|s| s.2), Some(BlobKind::Document));
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0]).map(|s| s.1), Some("jpg"));
        assert!(sniff(b"GIF").is_none());
        assert!(sniff(b"<html>").is_none());
    }

    #[tokio::test]
    async fn test_save_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = store(&dir);

        let saved = blobs.save("photo.PNG", PNG).await.unwrap();
        assert!(saved.url.starts_with("/uploads/images/"));
        assert!(saved.url.ends_with(".png"));
        assert_eq!(saved.mime_type, "image/png");
        assert!(dir.path().join("images").join(&saved.filename).exists());

        assert!(blobs.delete(&saved.url).await.unwrap());
        assert!(!blobs.delete(&saved.url).await.unwrap());
    }

    #[tokio::test]
    async fn test_documents_go_to_their_own_folder() {
        let dir = tempfile::tempdir().unwrap();
        let saved = store(&dir).save("brief.pdf", PDF).await.unwrap();
        assert!(saved.url.starts_with("/uploads/documents/"));
    }

    #[tokio::test]
    async fn test_base_url_is_prefixed_and_accepted_on_delete() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path(), "https://cdn.example.com");
        let saved = blobs.save("a.png", PNG).await.unwrap();
        assert!(saved.url.starts_with("https://cdn.example.com/uploads/images/"));
        assert!(blobs.delete(&saved.url).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_mismatched_or_empty_content() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = store(&dir);
        for (name, bytes) in [
            ("script.exe", PNG),
            ("fake.png", b"not an image".as_slice()),
            ("empty.png", b"".as_slice()),
        ] {
            assert!(matches!(
                blobs.save(name, bytes).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut big = PNG.to_vec();
        big.resize(MAX_IMAGE_SIZE + 1, 0);
        assert!(store(&dir).save("big.png", &big).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_refuses_traversal_and_foreign_urls() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = store(&dir);
        for url in [
            "/uploads/../secrets.txt",
            "/uploads/images/..",
            "/etc/passwd",
            "https://elsewhere.example.com/x.png",
        ] {
            assert!(matches!(blobs.delete(url).await, Err(AppError::Validation(_))));
        }
    }
}
