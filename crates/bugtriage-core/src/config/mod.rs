//! Configuration structs for the workspace. Each subsystem gets its own
//! `*Config` with a `Default` impl and a `from_env()` constructor that
//! reads the environment variables the external-interface contract lists;
//! unset or unparsable variables fall back silently to the default.

mod defaults;
mod embedding_config;
mod index_config;
mod quality_config;
mod recurrence_config;
mod similarity_config;
mod storage_config;

pub use embedding_config::EmbeddingConfig;
pub use index_config::IndexConfig;
pub use quality_config::QualityConfig;
pub use recurrence_config::RecurrenceConfig;
pub use similarity_config::SimilarityConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

/// Aggregate configuration for the whole workspace, assembled by the
/// service binary at startup and threaded down into each component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BugtriageConfig {
    pub quality: QualityConfig,
    pub similarity: SimilarityConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub index: IndexConfig,
    pub recurrence: RecurrenceConfig,
    pub log_level: String,
}

impl Default for BugtriageConfig {
    fn default() -> Self {
        Self {
            quality: QualityConfig::default(),
            similarity: SimilarityConfig::default(),
            embedding: EmbeddingConfig::default(),
            storage: StorageConfig::default(),
            index: IndexConfig::default(),
            recurrence: RecurrenceConfig::default(),
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BugtriageConfig {
    /// Build configuration by layering environment variables over the
    /// defaults, following the `LOG_LEVEL` and subsystem variable names the
    /// external-interface contract lists.
    pub fn from_env() -> Self {
        Self {
            quality: QualityConfig::from_env(),
            similarity: SimilarityConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            storage: StorageConfig::from_env(),
            index: IndexConfig::from_env(),
            recurrence: RecurrenceConfig::default(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults::DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
