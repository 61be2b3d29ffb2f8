#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use findoc_api::config::{AnalyzeMode, ServerConfig};
use findoc_api::router::build_app_router;
use findoc_api::state::AppState;
use findoc_pipeline::{AnalysisPipeline, PipelineError};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(analyze_mode: AnalyzeMode, upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        analyze_mode,
        embedded_worker: false,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and pipeline.
pub fn build_test_app(
    pool: PgPool,
    config: ServerConfig,
    pipeline: Arc<dyn AnalysisPipeline>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
    };
    build_app_router(state, &config)
}

/// Router in async mode with a pipeline that must never be called.
pub fn build_async_app(pool: PgPool, upload_dir: &Path) -> Router {
    build_test_app(
        pool,
        test_config(AnalyzeMode::Async, upload_dir),
        Arc::new(StubPipeline::ok("unused")),
    )
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const BOUNDARY: &str = "findoc-test-boundary";

/// A multipart form for `POST /analyze`.
#[derive(Default)]
pub struct AnalyzeForm {
    file: Option<(String, Vec<u8>)>,
    query: Option<String>,
}

impl AnalyzeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.file = Some((name.to_string(), data.to_vec()));
        self
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(query) = &self.query {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\n{query}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, data)) = &self.file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}

pub async fn post_analyze(app: Router, form: &AnalyzeForm) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.encode()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A small but well-formed upload payload.
pub const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n";

/// Names of the files currently in `dir`.
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Pipeline with a fixed outcome that records what it was asked to read.
pub struct StubPipeline {
    outcome: Result<String, String>,
    pub seen: Mutex<Vec<(String, PathBuf, bool)>>,
}

impl StubPipeline {
    pub fn ok(report: &str) -> Self {
        Self {
            outcome: Ok(report.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// `(query, path, file existed at call time)` for each call.
    pub fn calls(&self) -> Vec<(String, PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AnalysisPipeline for StubPipeline {
    async fn run(&self, query: &str, file_path: &Path) -> Result<String, PipelineError> {
        self.seen.lock().unwrap().push((
            query.to_string(),
            file_path.to_path_buf(),
            file_path.exists(),
        ));
        self.outcome
            .clone()
            .map_err(PipelineError::NotFinancialDocument)
    }
}
