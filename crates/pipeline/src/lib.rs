//! Financial document analysis pipeline.
//!
//! The rest of the workspace only sees [`AnalysisPipeline`]: one blocking
//! capability that turns a query and a document path into a text report.
//! [`CrewPipeline`] is the production implementation, a fixed chain of four
//! LLM-backed stages (verify, analyze, recommend, assess risk).

pub mod config;
pub mod crew;
pub mod document;
pub mod error;
pub mod findings;
pub mod llm;
pub mod rate_limit;
pub mod stages;

use std::path::Path;

pub use config::{LlmConfig, PipelineConfig};
pub use crew::CrewPipeline;
pub use error::{LlmError, PipelineError};

/// Turns a query and an uploaded document into an analysis report.
#[async_trait::async_trait]
pub trait AnalysisPipeline: Send + Sync {
    /// Run the full analysis. Returns the report text or the reason the
    /// document could not be analyzed.
    async fn run(&self, query: &str, file_path: &Path) -> Result<String, PipelineError>;
}
