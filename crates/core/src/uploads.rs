//! Naming of uploaded documents on local storage.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// File name prefix for stored uploads.
pub const DOCUMENT_PREFIX: &str = "financial_document_";

/// Fixed extension for stored uploads. The pipeline only reads PDFs.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// File name for an upload identified by `file_id`.
pub fn document_file_name(file_id: Uuid) -> String {
    format!("{DOCUMENT_PREFIX}{file_id}.{DOCUMENT_EXTENSION}")
}

/// Full path of an upload inside `upload_dir`.
pub fn document_path(upload_dir: &Path, file_id: Uuid) -> PathBuf {
    upload_dir.join(document_file_name(file_id))
}
