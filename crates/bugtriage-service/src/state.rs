//! Shared application state handed to every handler via axum's `State`
//! extractor.

use std::sync::Arc;

use bugtriage_core::config::BugtriageConfig;
use bugtriage_core::traits::{IBugStorage, IVectorIndex};
use bugtriage_detector::DuplicateDetector;
use bugtriage_observability::ObservabilityEngine;
use bugtriage_storage::StorageEngine;
use tokio::sync::Mutex;

/// Everything a handler needs: the orchestrator plus direct handles to
/// storage and the index for the read-only endpoints that don't go
/// through `DuplicateDetector` (lookups, search, health).
pub struct AppState {
    pub detector: DuplicateDetector,
    pub storage: Arc<dyn IBugStorage>,
    /// Concrete handle alongside the trait object, used only by the
    /// `/health` handler for SQLite-specific counters (`page_count`,
    /// `freelist_count`) that have no place on the generic storage seam.
    pub storage_engine: Arc<StorageEngine>,
    pub index: Arc<dyn IVectorIndex>,
    /// `HealthChecker`/`MetricsCollector`/etc. all need `&mut self`, so a
    /// single mutex guards the whole engine rather than one per piece.
    pub observability: Mutex<ObservabilityEngine>,
    pub config: BugtriageConfig,
}
