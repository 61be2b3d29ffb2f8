//! Repository for the `analysis_jobs` work queue.
//!
//! The queue is a plain table: submission inserts a row, workers claim the
//! oldest unclaimed row with `SELECT FOR UPDATE SKIP LOCKED`, and record the
//! outcome on the same row once execution ends. Claimed rows are never
//! handed out again.

use findoc_core::types::DbId;
use sqlx::PgPool;

use crate::models::queue::{EnqueueJob, QueuedJob};

/// Column list for `analysis_jobs` queries.
const COLUMNS: &str = "\
    id, record_id, query, file_path, enqueued_at, \
    claimed_at, claimed_by, finished_at, error_message";

/// Provides enqueue/claim/finish operations for queued analysis work.
pub struct AnalysisJobRepo;

impl AnalysisJobRepo {
    /// Add a unit of work to the queue.
    pub async fn enqueue(pool: &PgPool, input: &EnqueueJob) -> Result<QueuedJob, sqlx::Error> {
        let sql = format!(
            "INSERT INTO analysis_jobs (record_id, query, file_path) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueuedJob>(&sql)
            .bind(input.record_id)
            .bind(&input.query)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest unclaimed job for `worker_name`.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(
        pool: &PgPool,
        worker_name: &str,
    ) -> Result<Option<QueuedJob>, sqlx::Error> {
        let sql = format!(
            "UPDATE analysis_jobs \
             SET claimed_at = NOW(), claimed_by = $1 \
             WHERE id = ( \
                 SELECT id FROM analysis_jobs \
                 WHERE claimed_at IS NULL \
                 ORDER BY enqueued_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueuedJob>(&sql)
            .bind(worker_name)
            .fetch_optional(pool)
            .await
    }

    /// Record the end of an execution attempt. `error` is `None` on success.
    pub async fn finish(
        pool: &PgPool,
        job_id: DbId,
        error: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE analysis_jobs SET finished_at = NOW(), error_message = $2 WHERE id = $1",
        )
        .bind(job_id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a queued job by ID.
    pub async fn find_by_id(pool: &PgPool, job_id: DbId) -> Result<Option<QueuedJob>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM analysis_jobs WHERE id = $1");
        sqlx::query_as::<_, QueuedJob>(&sql)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of jobs waiting to be claimed.
    pub async fn count_unclaimed(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM analysis_jobs WHERE claimed_at IS NULL")
            .fetch_one(pool)
            .await
    }
}
