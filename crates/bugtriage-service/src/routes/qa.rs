//! `/api/qa` — human override endpoints: promote/reclassify a bug, and
//! approve or reject a queued low-quality submission.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtriage_core::models::{Bug, LowQualityQueue};
use serde::Deserialize;
use uuid::Uuid;

use super::bugs::run_blocking;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PromoteRequest {
    #[allow(dead_code)]
    pub user: String,
    #[allow(dead_code)]
    pub reason: Option<String>,
}

/// `POST /api/qa/bugs/{id}/promote`
pub async fn promote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(_req): Json<PromoteRequest>,
) -> Result<Json<Bug>, ApiError> {
    let bug = run_blocking(state, move |state| state.detector.promote(id)).await?;
    Ok(Json(bug))
}

#[derive(Deserialize)]
pub struct ReclassifyRequest {
    #[allow(dead_code)]
    pub user: String,
    pub parent_id: Uuid,
    #[allow(dead_code)]
    pub classification: Option<String>,
    #[allow(dead_code)]
    pub reason: Option<String>,
}

/// `POST /api/qa/bugs/{id}/reclassify`
pub async fn reclassify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReclassifyRequest>,
) -> Result<Json<Bug>, ApiError> {
    let bug = run_blocking(state, move |state| state.detector.reclassify(id, req.parent_id)).await?;
    Ok(Json(bug))
}

/// `GET /api/qa/low-quality`
pub async fn list_low_quality(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LowQualityQueue>>, ApiError> {
    Ok(Json(state.storage.pending_low_quality()?))
}

#[derive(Deserialize, Default)]
pub struct ReviewRequest {
    pub reviewer: Option<String>,
}

/// `POST /api/qa/low-quality/{id}/approve`
pub async fn approve_low_quality(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Response, ApiError> {
    let bug = run_blocking(state, move |state| {
        state.detector.approve_low_quality(id, req.reviewer)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(bug)).into_response())
}

/// `POST /api/qa/low-quality/{id}/reject`
pub async fn reject_low_quality(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<StatusCode, ApiError> {
    run_blocking(state, move |state| {
        state.detector.reject_low_quality(id, req.reviewer)
    })
    .await?;
    Ok(StatusCode::OK)
}
