//! Repository for the `analysis_results` table.
//!
//! Records are created `PENDING` by the submission path and settled exactly
//! once by a worker. Settling is a conditional update guarded on the current
//! status, so a redelivered job cannot overwrite a terminal record.

use findoc_core::types::DbId;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::analysis::AnalysisRecord;
use crate::models::status::AnalysisStatus;

/// Column list for `analysis_results` queries.
const COLUMNS: &str = "\
    id, external_id, query, status_id, result_text, \
    created_at, completed_at, updated_at";

/// Provides create/read/settle operations for analysis job records.
pub struct AnalysisRepo;

impl AnalysisRepo {
    /// Insert a new `PENDING` record.
    pub async fn create(
        pool: &PgPool,
        external_id: Uuid,
        query: &str,
    ) -> Result<AnalysisRecord, sqlx::Error> {
        let sql = format!(
            "INSERT INTO analysis_results (external_id, query, status_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalysisRecord>(&sql)
            .bind(external_id)
            .bind(query)
            .bind(AnalysisStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a record by its internal ID.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<AnalysisRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("SELECT {COLUMNS} FROM analysis_results WHERE id = $1");
        sqlx::query_as::<_, AnalysisRecord>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a record by the caller-facing task id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: Uuid,
    ) -> Result<Option<AnalysisRecord>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM analysis_results WHERE external_id = $1");
        sqlx::query_as::<_, AnalysisRecord>(&sql)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Settle a pending record as `SUCCESS` with the pipeline output.
    ///
    /// Returns `false` if the record was missing or already terminal.
    pub async fn mark_success<'e, E>(
        executor: E,
        id: DbId,
        analysis: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        Self::settle(executor, id, AnalysisStatus::Success, analysis).await
    }

    /// Settle a pending record as `FAILED` with an error description.
    ///
    /// Returns `false` if the record was missing or already terminal.
    pub async fn mark_failed<'e, E>(
        executor: E,
        id: DbId,
        error: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        Self::settle(executor, id, AnalysisStatus::Failed, error).await
    }

    async fn settle<'e, E>(
        executor: E,
        id: DbId,
        status: AnalysisStatus,
        text: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        debug_assert!(status.is_terminal());
        let result = sqlx::query(
            "UPDATE analysis_results \
             SET status_id = $2, result_text = $3, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(status.id())
        .bind(text)
        .bind(AnalysisStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
