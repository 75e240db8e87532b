use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Append-only audit trail event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    BugCreated,
    DuplicateDetected,
    DuplicateBlocked,
    LowQualityFlagged,
    QaOverride,
    BugPromoted,
    ClassificationChanged,
}

/// A single append-only audit record. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub event_type: AuditEventType,
    pub bug_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub actor: String,
    pub ai_confidence: Option<f64>,
    pub reasoning: Option<Value>,
    pub previous_state: Option<String>,
    pub new_state: Option<String>,
    pub created_at: DateTime<Utc>,
}
