//! Error taxonomy for the bug duplicate-detection pipeline.
//!
//! Each subsystem defines its own error enum; `BugtriageError` aggregates
//! them so callers crossing a crate boundary only need one `Result` type.
//! This mirrors the layered-error convention used throughout the storage
//! and embedding subsystems: subsystem errors carry structured context,
//! the root error just routes them.

mod detector_error;
mod embedding_error;
mod index_error;
mod quality_error;
mod similarity_error;
mod storage_error;

pub use detector_error::DetectorError;
pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use quality_error::QualityError;
pub use similarity_error::SimilarityError;
pub use storage_error::StorageError;

/// Top-level error type returned across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum BugtriageError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Quality(#[from] QualityError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("operation timed out after {elapsed_ms}ms (budget {budget_ms}ms)")]
    Timeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("resource not found: {resource} {id}")]
    NotFound { resource: String, id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias used throughout the workspace.
pub type BugtriageResult<T> = Result<T, BugtriageError>;

impl BugtriageError {
    /// Whether a retry by the caller is reasonable (matches spec.md §7:
    /// timeouts and external-service failures are transient, validation
    /// and not-found are not).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BugtriageError::Timeout { .. }
                | BugtriageError::Index(IndexError::Unreachable { .. })
                | BugtriageError::Embedding(EmbeddingError::ProviderUnavailable { .. })
        )
    }
}
