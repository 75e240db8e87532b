use serde::{Deserialize, Serialize};

use super::defaults;

/// Quality-gate thresholds (`MIN_DESCRIPTION_LENGTH`, `REQUIRE_REPRO_STEPS`,
/// `REQUIRE_LOGS`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub min_description_length: usize,
    pub require_repro_steps: bool,
    pub require_logs: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_description_length: defaults::default_min_description_length(),
            require_repro_steps: true,
            require_logs: false,
        }
    }
}

impl QualityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_description_length: super::env_usize(
                "MIN_DESCRIPTION_LENGTH",
                defaults.min_description_length,
            ),
            require_repro_steps: super::env_bool(
                "REQUIRE_REPRO_STEPS",
                defaults.require_repro_steps,
            ),
            require_logs: super::env_bool("REQUIRE_LOGS", defaults.require_logs),
        }
    }
}
