//! Typed errors for the pipeline and its LLM client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from LLM API operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response: no choices returned")]
    EmptyResponse,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

/// Reasons a pipeline run can fail. The `Display` output is what callers
/// see as the job's error text, so messages stay human-readable.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("File not found at path '{}'. Please upload a valid PDF.", .0.display())]
    DocumentNotFound(PathBuf),
    #[error("Unsupported file type. Expected a .pdf file, got '{0}'.")]
    UnsupportedFileType(String),
    #[error("No readable content found in the uploaded PDF.")]
    NoReadableContent,
    #[error("Could not read the document: {0}")]
    DocumentRead(String),
    #[error("The uploaded document is not a financial report: {0}")]
    NotFinancialDocument(String),
    #[error("The analysis pipeline crashed: {0}")]
    Crashed(String),
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: LlmError,
    },
}
