//! Two-tier embedding cache: L1 in-memory (moka), L2 on-disk (SQLite).
//! Keyed by the blake3 content hash of the assembled embedding text.

pub mod l1_memory;
pub mod l2_sqlite;

use std::path::Path;

pub use l1_memory::L1MemoryCache;
pub use l2_sqlite::L2SqliteCache;

/// Which tier served a cache hit, surfaced for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    L1,
    L2,
    Miss,
}

/// Coordinates the L1/L2 tiers: checks L1 first, falls through to L2 on
/// miss, and promotes L2 hits back into L1.
pub struct CacheCoordinator {
    l1: L1MemoryCache,
    l2: L2SqliteCache,
}

impl CacheCoordinator {
    pub fn new(l1_max_entries: u64) -> Self {
        Self {
            l1: L1MemoryCache::new(l1_max_entries),
            l2: L2SqliteCache::new(),
        }
    }

    pub fn with_disk_backing(l1_max_entries: u64, db_path: &Path) -> Self {
        Self {
            l1: L1MemoryCache::new(l1_max_entries),
            l2: L2SqliteCache::open(db_path),
        }
    }

    pub fn get(&self, content_hash: &str) -> (Option<Vec<f32>>, CacheTier) {
        if let Some(v) = self.l1.get(content_hash) {
            return (Some(v), CacheTier::L1);
        }
        if let Some(v) = self.l2.get(content_hash) {
            self.l1.insert(content_hash.to_string(), v.clone());
            return (Some(v), CacheTier::L2);
        }
        (None, CacheTier::Miss)
    }

    pub fn put(&mut self, content_hash: String, embedding: &[f32]) {
        self.l1.insert(content_hash.clone(), embedding.to_vec());
        self.l2.insert(content_hash, embedding);
    }

    /// Direct L1 access, for integration tests that need to verify the
    /// two tiers agree after a write-through.
    pub fn l1(&self) -> &L1MemoryCache {
        &self.l1
    }

    /// Direct L2 access, same rationale as `l1()`.
    pub fn l2(&self) -> &L2SqliteCache {
        &self.l2
    }

    /// Direct mutable L2 access, for tests that seed the L2 tier directly
    /// to simulate a cold L1 after a restart.
    pub fn l2_mut(&mut self) -> &mut L2SqliteCache {
        &mut self.l2
    }
}
