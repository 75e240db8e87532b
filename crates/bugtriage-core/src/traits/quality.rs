use crate::models::Submission;

/// Result of a quality check: whether the submission is routable, its
/// advisory score, and the set of issue codes found (empty iff valid).
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub is_valid: bool,
    pub score: f64,
    pub issues: Vec<String>,
}

/// Quality-gate seam. Implementations are pure functions of the
/// submission and static config; no I/O, no side effects.
pub trait IQualityChecker: Send + Sync {
    fn check(&self, submission: &Submission) -> QualityReport;
}
