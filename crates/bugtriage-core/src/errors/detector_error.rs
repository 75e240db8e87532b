/// Orchestrator (duplicate detector) errors.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("cycle detected while reclassifying: parent chain from {from} would include {to}")]
    CycleDetected { from: String, to: String },

    #[error("cannot promote bug {id}: not currently a duplicate")]
    NotADuplicate { id: String },

    #[error("cannot reclassify bug {id}: parent cannot equal self")]
    SelfParent { id: String },

    #[error("low-quality queue entry {id} already reviewed")]
    AlreadyReviewed { id: String },

    #[error("indexing compensation failed for bug {id}; marked PendingReindex: {reason}")]
    CompensationFailed { id: String, reason: String },
}
