use std::sync::Arc;

use findoc_pipeline::AnalysisPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: findoc_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Analysis pipeline, used directly by the synchronous `/analyze` mode.
    pub pipeline: Arc<dyn AnalysisPipeline>,
}
