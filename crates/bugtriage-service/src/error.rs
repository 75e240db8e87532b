//! Maps `BugtriageError` (and the handful of facade-only rejections) onto
//! the documented HTTP status codes and error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtriage_core::errors::{
    BugtriageError, DetectorError, EmbeddingError, IndexError, SimilarityError, StorageError,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Transport-layer wrapper around `BugtriageError`. Exists only so this
/// crate can impl `IntoResponse` for it without violating the orphan
/// rule on `bugtriage_core`'s own type.
pub struct ApiError(pub BugtriageError);

impl From<BugtriageError> for ApiError {
    fn from(err: BugtriageError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
    status: u16,
    timestamp: chrono::DateTime<Utc>,
    request_id: Uuid,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// `(status, code, details)` for a given error, following the taxonomy:
/// validation/not-found/conflict map to 4xx, anything requiring a human
/// to look at storage or the index maps to 5xx, and a failure in the
/// similarity/index path during detection is always transient (503),
/// never silently treated as "no duplicates found".
fn classify(err: &BugtriageError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        BugtriageError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error", None),
        BugtriageError::NotFound { .. } => (StatusCode::NOT_FOUND, "resource_not_found", None),
        BugtriageError::Timeout { elapsed_ms, budget_ms } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "timeout_error",
            Some(serde_json::json!({"elapsed_ms": elapsed_ms, "budget_ms": budget_ms})),
        ),
        BugtriageError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
        }

        BugtriageError::Storage(e) => classify_storage(e),
        BugtriageError::Embedding(e) => classify_embedding(e),
        BugtriageError::Index(e) => classify_index(e),
        BugtriageError::Similarity(e) => classify_similarity(e),
        BugtriageError::Quality(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "ai_processing_error", None)
        }
        BugtriageError::Detector(e) => classify_detector(e),
    }
}

fn classify_storage(err: &StorageError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        StorageError::BugNotFound { .. } => (StatusCode::NOT_FOUND, "resource_not_found", None),
        StorageError::PoolExhausted { active_connections } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "timeout_error",
            Some(serde_json::json!({"active_connections": active_connections})),
        ),
        StorageError::Sqlite { .. }
        | StorageError::MigrationFailed { .. }
        | StorageError::IntegrityViolation { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
        }
    }
}

fn classify_embedding(err: &EmbeddingError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        EmbeddingError::ProviderUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "timeout_error", None)
        }
        EmbeddingError::InferenceFailed { .. } | EmbeddingError::DimensionMismatch { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "ai_processing_error", None)
        }
    }
}

/// Index failures during detection are always fatal for the submission
/// that triggered them, never papered over as "no duplicates found";
/// `Unreachable` is retryable so it comes back as 503, the rest are
/// data-integrity problems a human needs to see.
fn classify_index(err: &IndexError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        IndexError::Unreachable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "timeout_error", None),
        IndexError::DimensionMismatch { .. }
        | IndexError::SnapshotFailed { .. }
        | IndexError::LoadFailed { .. }
        | IndexError::CorruptMapping { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "ai_processing_error", None)
        }
    }
}

fn classify_similarity(err: &SimilarityError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        SimilarityError::SearchFailed { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "timeout_error", None)
        }
        SimilarityError::DanglingCandidate { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
        }
    }
}

fn classify_detector(err: &DetectorError) -> (StatusCode, &'static str, Option<Value>) {
    match err {
        DetectorError::NotADuplicate { .. }
        | DetectorError::SelfParent { .. }
        | DetectorError::CycleDetected { .. }
        | DetectorError::AlreadyReviewed { .. } => {
            (StatusCode::BAD_REQUEST, "validation_error", None)
        }
        DetectorError::CompensationFailed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "ai_processing_error", None)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = classify(&self.0);
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.0.to_string(),
                details,
            },
            status: status.as_u16(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4(),
        };
        (status, Json(body)).into_response()
    }
}
