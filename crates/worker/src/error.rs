use findoc_pipeline::PipelineError;

/// Failure of one job execution attempt.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The pipeline failed. The record has already been settled as `FAILED`.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The outcome could not be written to the store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
