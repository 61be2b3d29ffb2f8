//! Queued analysis work model.

use findoc_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `analysis_jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct QueuedJob {
    pub id: DbId,
    /// The `analysis_results` row this job settles.
    pub record_id: DbId,
    pub query: String,
    pub file_path: String,
    pub enqueued_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub claimed_by: Option<String>,
    pub finished_at: Option<Timestamp>,
    pub error_message: Option<String>,
}

/// DTO for enqueueing a unit of analysis work.
#[derive(Debug, Clone)]
pub struct EnqueueJob {
    pub record_id: DbId,
    pub query: String,
    pub file_path: String,
}
