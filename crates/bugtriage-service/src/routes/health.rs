//! `GET /health` — 200 when every subsystem is healthy, 503 otherwise.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtriage_core::models::health::HealthStatus;
use bugtriage_observability::health::HealthSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match build_report(&state).await {
        Ok(report) => {
            let status = match report.overall_status {
                HealthStatus::Healthy => StatusCode::OK,
                HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(report)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn build_report(
    state: &AppState,
) -> bugtriage_core::errors::BugtriageResult<bugtriage_core::models::HealthReport> {
    let db_health = state.storage_engine.health()?;

    let snapshot = HealthSnapshot {
        storage_reachable: true,
        total_bugs: db_health.total_bugs,
        pending_low_quality: db_health.pending_low_quality,
        total_duplicate_history: db_health.total_duplicate_history,
        db_size_bytes: db_health.estimated_db_size(),
        fragmentation_pct: db_health.fragmentation_pct(),
        index_reachable: true,
        vector_index_size: state.index.len(),
        vector_index_dimensions: state.index.dimensions(),
    };

    let mut observability = state.observability.lock().await;
    observability.health_report(snapshot)
}
