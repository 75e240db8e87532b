use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector-index configuration (`FAISS_INDEX_PATH`, `INDEX_REBUILD_SCHEDULE`).
/// The path name follows the environment-variable contract; this workspace's
/// index implementation is the exact inner-product index in
/// `bugtriage-index`, not FAISS itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub index_path: String,
    /// Cron expression for the background rebuild scheduler.
    pub rebuild_schedule: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: defaults::DEFAULT_FAISS_INDEX_PATH.to_string(),
            rebuild_schedule: defaults::DEFAULT_INDEX_REBUILD_SCHEDULE.to_string(),
        }
    }
}

impl IndexConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            index_path: std::env::var("FAISS_INDEX_PATH").unwrap_or(defaults.index_path),
            rebuild_schedule: std::env::var("INDEX_REBUILD_SCHEDULE")
                .unwrap_or(defaults.rebuild_schedule),
        }
    }
}
