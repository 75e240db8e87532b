use serde::{Deserialize, Serialize};

use super::defaults;

/// Similarity-engine thresholds and region handling
/// (`SIMILARITY_THRESHOLD`, `LOW_CONFIDENCE_THRESHOLD`, `SUPPORTED_REGIONS`,
/// `CROSS_REGION_ENABLED`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Hybrid score at or above which a submission is blocked.
    pub high_threshold: f64,
    /// Hybrid score at or above which a created bug is flagged duplicate.
    pub low_threshold: f64,
    pub cross_region_enabled: bool,
    pub supported_regions: Vec<String>,
    /// Number of ranked candidates `find_similar` may return; the detector
    /// only ever needs the single best one, but callers (QA review
    /// tooling) benefit from seeing runners-up.
    pub top_k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            high_threshold: defaults::default_high_threshold(),
            low_threshold: defaults::default_low_threshold(),
            cross_region_enabled: true,
            supported_regions: Vec::new(),
            top_k: defaults::default_top_k(),
        }
    }
}

impl SimilarityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            high_threshold: super::env_f64("SIMILARITY_THRESHOLD", defaults.high_threshold),
            low_threshold: super::env_f64("LOW_CONFIDENCE_THRESHOLD", defaults.low_threshold),
            cross_region_enabled: super::env_bool(
                "CROSS_REGION_ENABLED",
                defaults.cross_region_enabled,
            ),
            supported_regions: std::env::var("SUPPORTED_REGIONS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.supported_regions),
            top_k: super::env_usize("SIMILARITY_TOP_K", defaults.top_k),
        }
    }
}
