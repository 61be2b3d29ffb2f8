//! Handlers for document submission, status polling and synchronous analysis.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use findoc_core::analysis::normalize_query;
use findoc_core::error::CoreError;
use findoc_core::types::Timestamp;
use findoc_db::models::queue::EnqueueJob;
use findoc_db::models::status::AnalysisStatus;
use findoc_db::repositories::{AnalysisJobRepo, AnalysisRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads::StoredDocument;

// ── Responses ────────────────────────────────────────────────────────

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Response for an accepted asynchronous submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub task_id: Uuid,
    pub message: String,
}

/// Snapshot of a job record as seen by a polling client.
///
/// `analysis` is present only on SUCCESS and `error` only on FAILED.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub task_id: Uuid,
    pub status: &'static str,
    pub submitted_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for a synchronous analysis.
#[derive(Debug, Serialize)]
pub struct SyncAnalysisResponse {
    pub status: &'static str,
    pub query: String,
    pub file_processed: String,
    pub crew_summary: String,
}

// ── Multipart form ───────────────────────────────────────────────────

/// Parsed `POST /analyze` form.
struct AnalysisForm {
    file_name: String,
    data: Vec<u8>,
    query: String,
}

/// Read the `file` and `query` fields. Unknown fields are ignored.
async fn read_analysis_form(mut multipart: Multipart) -> AppResult<AnalysisForm> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut query: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("document.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("query") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                query = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    Ok(AnalysisForm {
        file_name,
        data,
        query: normalize_query(query.as_deref()),
    })
}

// ── Handlers ─────────────────────────────────────────────────────────

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Financial Document Analyzer API is running",
    })
}

/// POST /analyze (async mode)
///
/// Stores the upload, creates a PENDING record and enqueues the job. The
/// pipeline never runs inside this request.
pub async fn submit_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let form = read_analysis_form(multipart).await?;
    let stored = StoredDocument::write(&state.config.upload_dir, &form.data).await?;

    let record = AnalysisRepo::create(&state.pool, Uuid::new_v4(), &form.query).await?;

    let job = EnqueueJob {
        record_id: record.id,
        query: form.query.clone(),
        file_path: stored.path().to_string_lossy().into_owned(),
    };
    if let Err(e) = AnalysisJobRepo::enqueue(&state.pool, &job).await {
        // The record has no job and stays PENDING.
        tracing::error!(
            record_id = record.id,
            task_id = %record.external_id,
            error = %e,
            "Failed to enqueue analysis job",
        );
        return Err(e.into());
    }

    // The worker owns the file from here on.
    stored.persist();

    tracing::info!(
        record_id = record.id,
        task_id = %record.external_id,
        file_name = %form.file_name,
        "Analysis submitted",
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            status: "submitted",
            task_id: record.external_id,
            message: "Document received. Poll /status/{task_id} for the result.".to_string(),
        }),
    ))
}

/// GET /status/{task_id}
pub async fn get_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Analysis task",
            id: task_id.clone(),
        })
    };

    let external_id = Uuid::parse_str(&task_id).map_err(|_| not_found())?;
    let record = AnalysisRepo::find_by_external_id(&state.pool, external_id)
        .await?
        .ok_or_else(not_found)?;

    let status = record.status();
    let (analysis, error) = match status {
        AnalysisStatus::Pending => (None, None),
        AnalysisStatus::Success => (record.result_text, None),
        AnalysisStatus::Failed => (None, record.result_text),
    };

    Ok(Json(StatusResponse {
        task_id: record.external_id,
        status: status.as_str(),
        submitted_at: record.created_at,
        analysis,
        error,
    }))
}

/// POST /analyze (sync mode)
///
/// Runs the pipeline inside the request. The upload is removed when
/// `stored` drops, whichever way the handler returns.
pub async fn analyze_sync(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<SyncAnalysisResponse>> {
    let form = read_analysis_form(multipart).await?;
    let stored = StoredDocument::write(&state.config.upload_dir, &form.data).await?;

    tracing::info!(file_name = %form.file_name, "Running synchronous analysis");
    let report = state.pipeline.run(&form.query, stored.path()).await?;

    Ok(Json(SyncAnalysisResponse {
        status: "success",
        query: form.query,
        file_processed: form.file_name,
        crew_summary: report,
    }))
}
