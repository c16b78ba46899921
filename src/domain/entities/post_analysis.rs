use crate::domain::values::analysis_kind::AnalysisKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored analysis run. Rows are never updated; the newest row for a
/// (post, kind) pair is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysis {
    pub id: i64,
    pub post_id: i64,
    pub kind: AnalysisKind,
    /// JSON-encoded payload.
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostAnalysis {
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.result)
    }
}

#[derive(Debug, Clone)]
pub struct NewPostAnalysis {
    pub post_id: i64,
    pub kind: AnalysisKind,
    pub result: String,
}
