use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity as reported by the submitter. Optional on the incoming
/// submission; absent severity never blocks quality or similarity gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Trivial,
}

/// Environment the defect was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    Staging,
    Development,
    Qa,
}

/// Lifecycle state of a `Bug` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    PendingReview,
    Approved,
    Rejected,
    Duplicate,
    Resolved,
    Closed,
    /// The Bug row committed but its vector-index insert failed; a
    /// background job must retry the index insert before this bug is
    /// visible to similarity search again.
    PendingReindex,
}

impl Status {
    /// Bugs in these states are excluded from similarity candidates unless
    /// their classification is `Recurring` (see `Bug::is_search_candidate`).
    pub fn is_retired(self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

/// The outcome of recurrence/duplicate classification. A bug has at most
/// one of these at a time; `None` means neither applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Duplicate,
    Recurring,
    None,
}

/// Who/what submitted a report, carried through from the submission into
/// the stored `Bug` row for audit purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionContext {
    pub submitter_id: Option<String>,
    pub api_key_id: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub is_automated: bool,
    pub client_version: Option<String>,
}

/// The primary entity: a stored defect report after it has passed through
/// the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: Uuid,

    // Required attributes.
    pub title: String,
    pub description: String,
    pub product: String,

    // Optional attributes.
    pub component: Option<String>,
    pub version: Option<String>,
    pub severity: Option<Severity>,
    pub environment: Option<Environment>,
    pub device: Option<String>,
    pub os_version: Option<String>,
    pub build_version: Option<String>,
    pub region: Option<String>,
    pub reporter: Option<String>,
    pub repro_steps: Vec<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub logs: Option<String>,

    // Derived attributes.
    pub quality_score: f64,
    pub embedding: Option<Vec<f32>>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
    pub similarity_score: Option<f64>,
    pub is_recurring: bool,
    pub classification: Classification,
    pub status: Status,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub context: SubmissionContext,
}

impl Bug {
    /// A bug is a valid similarity candidate unless it has been retired
    /// (resolved/closed) and is not a recurring parent — per the data
    /// model's candidate-exclusion rule.
    pub fn is_search_candidate(&self) -> bool {
        !self.status.is_retired() || self.classification == Classification::Recurring
    }

    /// `duplicate_of` must never equal the bug's own id.
    pub fn has_valid_duplicate_of(&self) -> bool {
        self.duplicate_of != Some(self.id)
    }

    /// `is_duplicate` and `duplicate_of` must agree, as must
    /// `similarity_score` and `duplicate_of`.
    pub fn has_consistent_duplicate_fields(&self) -> bool {
        (self.is_duplicate == self.duplicate_of.is_some())
            && (self.similarity_score.is_some() == self.duplicate_of.is_some())
    }
}
