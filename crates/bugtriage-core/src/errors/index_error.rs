/// Vector-index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("vector index unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("dimension mismatch: index is {index_dim}-d, got {query_dim}-d")]
    DimensionMismatch { index_dim: usize, query_dim: usize },

    #[error("failed to persist index snapshot at {path}: {reason}")]
    SnapshotFailed { path: String, reason: String },

    #[error("failed to load index snapshot at {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("mapping and vector data are inconsistent: {details}")]
    CorruptMapping { details: String },
}
