use uuid::Uuid;

use bugtriage_core::models::{Bug, LowQualityQueue};

/// Result of running a submission through the full duplicate-detection
/// pipeline.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// No similar bug cleared `low_threshold`: a new row was created.
    Created(Bug),
    /// Best hybrid score fell in `[low_threshold, high_threshold)`: a new
    /// row was created, linked as a duplicate of `parent_id`.
    FlaggedDuplicate { bug: Bug, parent_id: Uuid },
    /// Best hybrid score reached `high_threshold`: no row was created.
    BlockedDuplicate { parent_id: Uuid },
    /// Quality gate rejected the submission; held for human review.
    LowQuality(LowQualityQueue),
}
