//! Scoped storage of uploaded documents.

use std::path::{Path, PathBuf};

use findoc_core::uploads::document_path;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// An uploaded document written to the upload directory.
///
/// The file is deleted when the value is dropped, on every exit path,
/// unless [`StoredDocument::persist`] hands ownership of the file to a
/// queued job.
#[derive(Debug)]
pub struct StoredDocument {
    path: PathBuf,
    armed: bool,
}

impl StoredDocument {
    /// Write `data` under `upload_dir` with a freshly generated name.
    ///
    /// The returned path is absolute, so a worker running from another
    /// directory can open it.
    pub async fn write(upload_dir: &Path, data: &[u8]) -> AppResult<Self> {
        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| AppError::InternalError(format!("create upload dir: {e}")))?;
        let dir = tokio::fs::canonicalize(upload_dir)
            .await
            .map_err(|e| AppError::InternalError(format!("resolve upload dir: {e}")))?;

        // Armed before writing so a partial write is cleaned up too.
        let stored = Self {
            path: document_path(&dir, Uuid::new_v4()),
            armed: true,
        };
        tokio::fs::write(&stored.path, data)
            .await
            .map_err(|e| AppError::InternalError(format!("write upload: {e}")))?;

        tracing::debug!(path = %stored.path.display(), bytes = data.len(), "Stored uploaded document");
        Ok(stored)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk and return its path.
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StoredDocument {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed uploaded document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Could not remove uploaded document",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_document_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredDocument::write(dir.path(), b"%PDF-1.4").await.unwrap();
        let path = stored.path().to_path_buf();

        assert!(path.is_absolute());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("financial_document_"));

        drop(stored);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn persisted_document_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredDocument::write(&dir.path().join("nested"), b"data")
            .await
            .unwrap();

        let path = stored.persist();
        assert!(path.exists());
    }
}
