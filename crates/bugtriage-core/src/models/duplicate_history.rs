use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submission::Submission;

/// Immutable record of a duplicate-detection decision. Written once, never
/// mutated. `candidate_id` is `None` when the submission was blocked
/// outright and no `Bug` row was ever created for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateHistory {
    pub id: Uuid,
    pub original_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub similarity_score: f64,
    pub method: String,
    pub was_blocked: bool,
    pub submission_snapshot: Submission,
    pub detected_at: DateTime<Utc>,
}
