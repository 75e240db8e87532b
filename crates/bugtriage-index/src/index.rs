use std::path::PathBuf;
use std::sync::Mutex;

use arc_swap::ArcSwap;
use uuid::Uuid;

use bugtriage_core::errors::{BugtriageResult, IndexError};
use bugtriage_core::traits::{IVectorIndex, IndexMatch};
use tracing::{debug, info};

use crate::persistence::PersistencePaths;
use crate::snapshot::Snapshot;

/// Exact nearest-neighbor vector index over unit-norm `f32` vectors.
///
/// Reads go through an `ArcSwap<Snapshot>` and never block: a reader
/// clones the `Arc`, scans it, and is unaffected by a concurrent
/// `rebuild`. Writes (`add`, `rebuild`) are serialized by `write_lock` so
/// two writers can't race to publish a snapshot built from a stale base.
pub struct VectorIndex {
    dimensions: usize,
    current: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
    paths: Option<PersistencePaths>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            current: ArcSwap::from_pointee(Snapshot::empty(dimensions)),
            write_lock: Mutex::new(()),
            paths: None,
        }
    }

    /// Create an index backed by `<stem>.index` / `<stem>.mapping`,
    /// loading an existing snapshot from disk if present.
    pub fn with_persistence(dimensions: usize, stem: impl Into<PathBuf>) -> BugtriageResult<Self> {
        let paths = PersistencePaths::new(stem.into());
        let snapshot = match paths.load()? {
            Some(snapshot) => {
                if snapshot.dimensions != dimensions {
                    return Err(IndexError::DimensionMismatch {
                        index_dim: dimensions,
                        query_dim: snapshot.dimensions,
                    }
                    .into());
                }
                snapshot
            }
            None => Snapshot::empty(dimensions),
        };

        Ok(Self {
            dimensions,
            current: ArcSwap::from_pointee(snapshot),
            write_lock: Mutex::new(()),
            paths: Some(paths),
        })
    }

    fn check_dimensions(&self, vector_len: usize) -> BugtriageResult<()> {
        if vector_len != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                index_dim: self.dimensions,
                query_dim: vector_len,
            }
            .into());
        }
        Ok(())
    }
}

impl IVectorIndex for VectorIndex {
    fn add(&self, bug_id: Uuid, vector: &[f32]) -> BugtriageResult<()> {
        self.check_dimensions(vector.len())?;
        let _guard = self.write_lock.lock().unwrap();
        let base = self.current.load();
        let next = base.with_appended(bug_id, vector);
        self.current.store(std::sync::Arc::new(next));
        debug!(bug_id = %bug_id, total = self.len(), "inserted vector into index");
        Ok(())
    }

    fn search(&self, query: &[f32], limit: usize) -> BugtriageResult<Vec<IndexMatch>> {
        self.check_dimensions(query.len())?;
        let snapshot = self.current.load();
        Ok(snapshot.search(query, limit))
    }

    fn rebuild(&self, entries: &[(Uuid, Vec<f32>)]) -> BugtriageResult<()> {
        for (_, vector) in entries {
            self.check_dimensions(vector.len())?;
        }
        let _guard = self.write_lock.lock().unwrap();
        let next = Snapshot::from_entries(self.dimensions, entries);
        info!(rows = next.len(), "rebuilt vector index from scratch");
        self.current.store(std::sync::Arc::new(next));
        Ok(())
    }

    fn persist(&self) -> BugtriageResult<()> {
        let Some(paths) = &self.paths else {
            return Err(IndexError::SnapshotFailed {
                path: "<unset>".to_string(),
                reason: "index was not constructed with a persistence path".to_string(),
            }
            .into());
        };
        let snapshot = self.current.load();
        paths.save(&snapshot)
    }

    fn len(&self) -> usize {
        self.current.load().len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn unit(dims: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; dims];
        v[hot] = 1.0;
        v
    }

    #[test]
    fn add_then_search_finds_exact_match() {
        let index = VectorIndex::new(4);
        let id = Uuid::new_v4();
        index.add(id, &unit(4, 0)).unwrap();

        let results = index.search(&unit(4, 0), 1).unwrap();
        assert_eq!(results[0].bug_id, id);
    }

    #[test]
    fn add_with_wrong_dimensions_errors() {
        let index = VectorIndex::new(4);
        let err = index.add(Uuid::new_v4(), &[1.0, 0.0]).unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[test]
    fn rebuild_replaces_all_entries() {
        let index = VectorIndex::new(4);
        index.add(Uuid::new_v4(), &unit(4, 0)).unwrap();
        assert_eq!(index.len(), 1);

        let fresh = vec![
            (Uuid::new_v4(), unit(4, 1)),
            (Uuid::new_v4(), unit(4, 2)),
        ];
        index.rebuild(&fresh).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn persist_without_path_errors() {
        let index = VectorIndex::new(4);
        assert!(index.persist().is_err());
    }

    #[test]
    fn persist_then_reload_survives_restart() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("bugs");

        let id = Uuid::new_v4();
        {
            let index = VectorIndex::with_persistence(4, &stem).unwrap();
            index.add(id, &unit(4, 0)).unwrap();
            index.persist().unwrap();
        }

        let reloaded = VectorIndex::with_persistence(4, &stem).unwrap();
        assert_eq!(reloaded.len(), 1);
        let results = reloaded.search(&unit(4, 0), 1).unwrap();
        assert_eq!(results[0].bug_id, id);
    }

    #[test]
    fn with_persistence_rejects_dimension_mismatch_on_reload() {
        let dir = tempdir().unwrap();
        let stem = dir.path().join("bugs");

        {
            let index = VectorIndex::with_persistence(4, &stem).unwrap();
            index.add(Uuid::new_v4(), &unit(4, 0)).unwrap();
            index.persist().unwrap();
        }

        let err = VectorIndex::with_persistence(8, &stem).unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[test]
    fn readers_see_consistent_snapshot_during_rebuild() {
        let index = VectorIndex::new(4);
        index.add(Uuid::new_v4(), &unit(4, 0)).unwrap();

        let snapshot_before = index.search(&unit(4, 0), 10).unwrap();
        assert_eq!(snapshot_before.len(), 1);

        index.rebuild(&[]).unwrap();
        assert_eq!(index.len(), 0);
        // the handle obtained before rebuild is a plain Vec, unaffected
        assert_eq!(snapshot_before.len(), 1);
    }
}
