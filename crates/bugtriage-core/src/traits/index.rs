use uuid::Uuid;

use crate::errors::BugtriageResult;

/// A single result from a nearest-neighbor search: the matched bug id and
/// its raw vector score (inner product of unit vectors, i.e. cosine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexMatch {
    pub bug_id: Uuid,
    pub vector_score: f64,
}

/// Vector-index seam implemented by the index crate.
pub trait IVectorIndex: Send + Sync {
    /// Insert a unit-norm vector under `bug_id`. `vector.len()` must equal
    /// `dimensions()`.
    fn add(&self, bug_id: Uuid, vector: &[f32]) -> BugtriageResult<()>;

    /// Nearest neighbors to `query` by inner product, highest score first.
    fn search(&self, query: &[f32], limit: usize) -> BugtriageResult<Vec<IndexMatch>>;

    /// Atomically replace the index contents with a fresh snapshot built
    /// from `entries`. Readers see either the old or the new snapshot,
    /// never a partial one.
    fn rebuild(&self, entries: &[(Uuid, Vec<f32>)]) -> BugtriageResult<()>;

    /// Persist the current snapshot to disk.
    fn persist(&self) -> BugtriageResult<()>;

    /// Number of vectors currently indexed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expected vector dimensionality.
    fn dimensions(&self) -> usize;
}
