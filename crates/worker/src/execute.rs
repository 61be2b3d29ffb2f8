//! Single execution attempt for a queued job.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use findoc_db::models::queue::QueuedJob;
use findoc_db::repositories::AnalysisRepo;
use findoc_db::DbPool;
use findoc_pipeline::{AnalysisPipeline, PipelineError};
use futures::FutureExt;

use crate::error::WorkerError;

/// Effect of an execution attempt on the job record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The record moved from `PENDING` to `SUCCESS`/`FAILED`.
    Applied,
    /// The record was already terminal; nothing was written.
    AlreadySettled,
}

impl Settlement {
    fn from_applied(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::AlreadySettled
        }
    }
}

/// Run the pipeline for `job` and settle its record.
///
/// Each write uses a freshly acquired pooled connection that is released
/// before returning; nothing is held across the pipeline call. The write is
/// conditional on the record still being `PENDING`, so redelivery of an
/// already-settled job leaves the stored outcome unchanged.
///
/// On pipeline failure (including a panic) the record is settled as
/// `FAILED` with the error's display text and the error is returned as
/// [`WorkerError::Pipeline`].
pub async fn execute_job(
    pool: &DbPool,
    pipeline: &dyn AnalysisPipeline,
    job: &QueuedJob,
) -> Result<Settlement, WorkerError> {
    tracing::info!(
        job_id = job.id,
        record_id = job.record_id,
        file_path = %job.file_path,
        "Running analysis pipeline",
    );

    // A panic inside the pipeline settles the record like any other failure.
    let outcome = AssertUnwindSafe(pipeline.run(&job.query, Path::new(&job.file_path)))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(PipelineError::Crashed(panic_message(panic.as_ref()))));

    match outcome {
        Ok(report) => {
            let applied = {
                let mut conn = pool.acquire().await?;
                AnalysisRepo::mark_success(&mut *conn, job.record_id, &report).await?
            };
            let settlement = Settlement::from_applied(applied);
            match settlement {
                Settlement::Applied => tracing::info!(
                    job_id = job.id,
                    record_id = job.record_id,
                    chars = report.len(),
                    "Analysis succeeded",
                ),
                Settlement::AlreadySettled => tracing::warn!(
                    job_id = job.id,
                    record_id = job.record_id,
                    "Record already settled; discarding duplicate success",
                ),
            }
            Ok(settlement)
        }
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(
                job_id = job.id,
                record_id = job.record_id,
                error = %message,
                "Analysis failed",
            );
            let applied = {
                let mut conn = pool.acquire().await?;
                AnalysisRepo::mark_failed(&mut *conn, job.record_id, &message).await?
            };
            if !applied {
                tracing::warn!(
                    job_id = job.id,
                    record_id = job.record_id,
                    "Record already settled; discarding duplicate failure",
                );
            }
            Err(WorkerError::Pipeline(e))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
