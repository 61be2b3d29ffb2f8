use axum::routing::{get, post};
use axum::Router;

use crate::config::AnalyzeMode;
use crate::handlers::analysis;
use crate::state::AppState;

/// Analysis routes.
///
/// ```text
/// POST /analyze              submit (async mode) or run inline (sync mode)
/// GET  /status/{task_id}     poll a submitted analysis
/// ```
pub fn router(mode: AnalyzeMode) -> Router<AppState> {
    let analyze = match mode {
        AnalyzeMode::Async => post(analysis::submit_analysis),
        AnalyzeMode::Sync => post(analysis::analyze_sync),
    };

    Router::new()
        .route("/analyze", analyze)
        .route("/status/{task_id}", get(analysis::get_status))
}
