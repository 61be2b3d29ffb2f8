//! Queue polling loop.
//!
//! Polls `analysis_jobs` every `poll_interval` and claims jobs while a
//! concurrency permit is free. Each claimed job runs in its own task; its
//! queue row is finished and (optionally) its upload removed when the
//! attempt ends. Claimed jobs are never re-queued.

use std::path::Path;
use std::sync::Arc;

use findoc_db::models::queue::QueuedJob;
use findoc_db::repositories::AnalysisJobRepo;
use findoc_db::DbPool;
use findoc_pipeline::AnalysisPipeline;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::execute::execute_job;

/// Long-lived queue consumer.
pub struct Worker {
    pool: DbPool,
    pipeline: Arc<dyn AnalysisPipeline>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(pool: DbPool, pipeline: Arc<dyn AnalysisPipeline>, config: WorkerConfig) -> Self {
        Self {
            pool,
            pipeline,
            config,
        }
    }

    /// Run until `cancel` fires, then stop claiming and wait for in-flight
    /// jobs to end.
    pub async fn run(self, cancel: CancellationToken) {
        let permits = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();
        let mut ticker = tokio::time::interval(self.config.poll_interval);

        match AnalysisJobRepo::count_unclaimed(&self.pool).await {
            Ok(backlog) => tracing::info!(
                worker = %self.config.name,
                concurrency = self.config.concurrency,
                poll_interval_ms = self.config.poll_interval.as_millis() as u64,
                backlog,
                "Analysis worker started",
            ),
            Err(e) => tracing::warn!(error = %e, "Could not read queue backlog"),
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(worker = %self.config.name, "Analysis worker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.claim_available(&permits, &mut tasks).await;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Analysis task panicked");
                    }
                }
            }
        }

        let in_flight = tasks.len();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for in-flight analyses");
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Analysis task panicked");
            }
        }
        tracing::info!(worker = %self.config.name, "Analysis worker stopped");
    }

    /// Claim jobs until the queue is empty or no permit is free.
    async fn claim_available(&self, permits: &Arc<Semaphore>, tasks: &mut JoinSet<()>) {
        while let Ok(permit) = Arc::clone(permits).try_acquire_owned() {
            match AnalysisJobRepo::claim_next(&self.pool, &self.config.name).await {
                Ok(Some(job)) => {
                    tracing::info!(
                        job_id = job.id,
                        record_id = job.record_id,
                        worker = %self.config.name,
                        "Job claimed",
                    );
                    tasks.spawn(process(
                        self.pool.clone(),
                        Arc::clone(&self.pipeline),
                        job,
                        self.config.cleanup_uploads,
                        permit,
                    ));
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim next job");
                    break;
                }
            }
        }
    }
}

/// Execute one claimed job and record the attempt on its queue row.
async fn process(
    pool: DbPool,
    pipeline: Arc<dyn AnalysisPipeline>,
    job: QueuedJob,
    cleanup_uploads: bool,
    _permit: OwnedSemaphorePermit,
) {
    let outcome = execute_job(&pool, pipeline.as_ref(), &job).await;

    let error = outcome.as_ref().err().map(ToString::to_string);
    if let Err(e) = AnalysisJobRepo::finish(&pool, job.id, error.as_deref()).await {
        tracing::error!(job_id = job.id, error = %e, "Failed to finish queue row");
    }

    if let Err(crate::WorkerError::Database(e)) = &outcome {
        // The record could not be settled and stays PENDING.
        tracing::error!(
            job_id = job.id,
            record_id = job.record_id,
            error = %e,
            "Failed to record analysis outcome",
        );
    }

    if cleanup_uploads {
        remove_upload(Path::new(&job.file_path)).await;
    }
}

async fn remove_upload(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed uploaded document"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Could not remove uploaded document",
        ),
    }
}
