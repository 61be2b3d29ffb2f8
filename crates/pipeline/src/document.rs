//! Reading uploaded financial documents into plain text.

use std::path::Path;

use crate::error::PipelineError;

/// Read a PDF and return its text, one line per page with whitespace
/// collapsed.
///
/// Fails if the file is missing, is not a `.pdf`, cannot be parsed, or
/// contains no extractable text.
pub async fn read_financial_document(path: &Path) -> Result<String, PipelineError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(PipelineError::DocumentNotFound(path.to_path_buf()));
    }

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        return Err(PipelineError::UnsupportedFileType(ext));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::DocumentRead(e.to_string()))?;

    // The extractor is CPU-bound and may panic on malformed input; keep it
    // off the async workers and turn a panic into an ordinary error.
    let pages =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .await
            .map_err(|e| PipelineError::DocumentRead(format!("PDF parser crashed: {e}")))?
            .map_err(|e| PipelineError::DocumentRead(e.to_string()))?;

    let text = join_pages(&pages);
    if text.is_empty() {
        return Err(PipelineError::NoReadableContent);
    }
    Ok(text)
}

/// Collapse whitespace inside each page and join non-empty pages with `\n`.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep at most `max_chars` characters of `text`.
pub fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
