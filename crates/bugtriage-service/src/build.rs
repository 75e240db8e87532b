//! Wires a `BugtriageConfig` into a running `AppState`: opens storage,
//! loads (or creates) the persisted vector index, and assembles the
//! detector from concrete implementations behind their trait objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bugtriage_core::config::BugtriageConfig;
use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::traits::{IBugStorage, IEmbeddingProvider, IQualityChecker, ISimilarityEngine, IVectorIndex};
use bugtriage_detector::DuplicateDetector;
use bugtriage_embeddings::EmbeddingEngine;
use bugtriage_index::VectorIndex;
use bugtriage_observability::ObservabilityEngine;
use bugtriage_quality::QualityChecker;
use bugtriage_recurrence::RecurrenceTracker;
use bugtriage_similarity::SimilarityEngine;
use bugtriage_storage::StorageEngine;
use tokio::sync::Mutex;
use tracing::info;

use crate::state::AppState;

/// Build the full dependency graph from configuration. Each component is
/// handed only the trait objects it needs, the same seam the pipeline's
/// test fakes sit behind.
pub fn build_state(config: BugtriageConfig) -> BugtriageResult<AppState> {
    let db_path = sqlite_path(&config.storage.database_url);

    let storage_engine = Arc::new(StorageEngine::open(&db_path)?);
    let storage: Arc<dyn IBugStorage> = storage_engine.clone();
    let index: Arc<dyn IVectorIndex> = Arc::new(VectorIndex::with_persistence(
        config.embedding.vector_dimension,
        config.index.index_path.clone(),
    )?);

    let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(EmbeddingEngine::with_disk_cache(
        config.embedding.clone(),
        &db_path,
    ));
    let quality: Arc<dyn IQualityChecker> = Arc::new(QualityChecker::new(config.quality.clone()));
    let similarity: Arc<dyn ISimilarityEngine> =
        Arc::new(SimilarityEngine::new(storage.clone(), index.clone()));
    let recurrence = RecurrenceTracker::new(storage.clone(), config.recurrence);

    let detector = DuplicateDetector::new(
        quality,
        embedder,
        similarity,
        index.clone(),
        storage.clone(),
        recurrence,
        config.similarity.clone(),
    );

    info!(
        vectors = index.len(),
        dimensions = index.dimensions(),
        "vector index loaded"
    );

    Ok(AppState {
        detector,
        storage,
        storage_engine,
        index,
        observability: Mutex::new(ObservabilityEngine::new()),
        config,
    })
}

/// `sqlite://path/to/file.db` and bare paths both resolve to the path
/// component; `:memory:` is passed through unchanged (callers wanting an
/// in-memory store should use `StorageEngine::open_in_memory` directly).
fn sqlite_path(database_url: &str) -> PathBuf {
    Path::new(database_url.strip_prefix("sqlite://").unwrap_or(database_url)).to_path_buf()
}
