use serde::{Deserialize, Serialize};

use super::defaults;

/// Persistence-layer configuration (`DATABASE_URL`, `REDIS_URL`). The Redis
/// URL is carried for parity with the environment-variable contract but is
/// unused by the core pipeline; no component in this workspace reaches for
/// it today.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
    pub redis_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DEFAULT_DATABASE_URL.to_string(),
            redis_url: defaults::DEFAULT_REDIS_URL.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
        }
    }
}
