use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submission::Submission;

/// Review state of a `LowQualityQueue` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    Approved,
    Rejected,
}

/// A submission that failed the quality gate, held for manual QA review
/// rather than silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowQualityQueue {
    pub id: Uuid,
    pub submission: Submission,
    /// Enumerated issue codes from the quality checker (§4.3).
    pub quality_issues: HashSet<String>,
    pub status: QueueStatus,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Set once an approved entry has produced a `Bug` row.
    pub created_bug_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
