//! Analysis job record model.

use findoc_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{AnalysisStatus, StatusId};

/// A row from the `analysis_results` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnalysisRecord {
    pub id: DbId,
    /// Caller-facing task id.
    pub external_id: Uuid,
    pub query: String,
    pub status_id: StatusId,
    /// Pipeline output on success, error description on failure.
    pub result_text: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl AnalysisRecord {
    /// Decoded status. Unknown IDs are treated as pending, since they can
    /// only come from a lookup row added without a matching enum variant.
    pub fn status(&self) -> AnalysisStatus {
        AnalysisStatus::from_id(self.status_id).unwrap_or(AnalysisStatus::Pending)
    }
}
