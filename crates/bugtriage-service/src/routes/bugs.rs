//! `/api/bugs` — submission, lookup, duplicate listing, search.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtriage_core::errors::BugtriageError;
use bugtriage_core::models::bug::{Severity, Status};
use bugtriage_core::models::{Bug, DuplicateHistory, Submission};
use bugtriage_core::traits::BugSearchFilter;
use bugtriage_detector::Outcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::SubmitterContext;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

/// `POST /api/bugs/` — runs the submission through the detection
/// pipeline. `process` is synchronous and does blocking SQLite I/O, so it
/// runs on the blocking pool rather than the async executor.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    SubmitterContext(context): SubmitterContext,
    Json(mut submission): Json<Submission>,
) -> Result<Response, ApiError> {
    submission.context = context;

    let outcome = run_blocking(state.clone(), move |state| state.detector.process(submission)).await?;

    match outcome {
        Outcome::Created(bug) => Ok((StatusCode::CREATED, Json(bug)).into_response()),
        Outcome::FlaggedDuplicate { bug, parent_id } => {
            Ok((StatusCode::CREATED, Json(FlaggedResponse { bug, parent_id })).into_response())
        }
        Outcome::BlockedDuplicate { parent_id } => {
            let history = state.storage.duplicate_history_for(parent_id)?;
            let latest = history.first();
            let body = BlockedResponse {
                original_id: parent_id,
                similarity_score: latest.map(|h| h.similarity_score).unwrap_or_default(),
                reason: "duplicate of an existing bug".to_string(),
            };
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        Outcome::LowQuality(entry) => {
            let body = LowQualityResponse {
                queue_id: entry.id,
                issues: entry.quality_issues.into_iter().collect(),
            };
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
    }
}

#[derive(Serialize)]
struct FlaggedResponse {
    #[serde(flatten)]
    bug: Bug,
    parent_id: Uuid,
}

#[derive(Serialize)]
struct BlockedResponse {
    original_id: Uuid,
    similarity_score: f64,
    reason: String,
}

#[derive(Serialize)]
struct LowQualityResponse {
    queue_id: Uuid,
    issues: Vec<String>,
}

#[derive(Deserialize, Default)]
pub struct GetBugParams {
    #[serde(default)]
    include_duplicates: bool,
}

#[derive(Serialize)]
struct BugWithDuplicates {
    #[serde(flatten)]
    bug: Bug,
    duplicates: Vec<Bug>,
}

/// `GET /api/bugs/{id}?include_duplicates=bool`
pub async fn get_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<GetBugParams>,
) -> Result<Response, ApiError> {
    let bug = state.storage.get_bug(id)?.ok_or_else(|| not_found(id))?;

    if params.include_duplicates {
        let duplicates = state.storage.duplicates_of(id)?;
        Ok(Json(BugWithDuplicates { bug, duplicates }).into_response())
    } else {
        Ok(Json(bug).into_response())
    }
}

#[derive(Serialize)]
struct DuplicatesResponse {
    duplicates: Vec<Bug>,
    history: Vec<DuplicateHistory>,
}

/// `GET /api/bugs/{id}/duplicates`
pub async fn duplicates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    state.storage.get_bug(id)?.ok_or_else(|| not_found(id))?;

    let duplicates = state.storage.duplicates_of(id)?;
    let history = state.storage.duplicate_history_for(id)?;
    Ok(Json(DuplicatesResponse { duplicates, history }))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub product: Option<String>,
    pub status: Option<Status>,
    pub severity: Option<Severity>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub bugs: Vec<Bug>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// `GET /api/bugs/search?q,product,status,severity,limit,offset`
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let filter = BugSearchFilter {
        q: params.q,
        product: params.product,
        status: params.status,
        severity: params.severity,
        limit: params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT),
        offset: params.offset.unwrap_or(0),
    };
    let (bugs, total) = state.storage.search_bugs(&filter)?;
    Ok(Json(SearchResponse {
        bugs,
        total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

fn not_found(id: Uuid) -> BugtriageError {
    BugtriageError::NotFound {
        resource: "bug".to_string(),
        id: id.to_string(),
    }
}

/// Runs a synchronous, blocking-SQLite closure against `state` on the
/// blocking pool. Panics propagate rather than being swallowed, matching
/// `tokio`'s own default behavior for a panicking task.
pub(crate) async fn run_blocking<F, T>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> bugtriage_core::errors::BugtriageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .expect("blocking task panicked")
        .map_err(ApiError::from)
}
