use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding-provider configuration (`EMBEDDING_MODEL`, `VECTOR_DIMENSION`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub vector_dimension: usize,
    /// Max entry count for the L1 in-memory cache tier.
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            vector_dimension: defaults::default_vector_dimension(),
            l1_cache_size: 10_000,
        }
    }
}

impl EmbeddingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: std::env::var("EMBEDDING_MODEL").unwrap_or(defaults.model),
            vector_dimension: super::env_usize("VECTOR_DIMENSION", defaults.vector_dimension),
            l1_cache_size: defaults.l1_cache_size,
        }
    }
}
