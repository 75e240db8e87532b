use serde::{Deserialize, Serialize};

use super::defaults;

/// Recurrence-tracker threshold. Not independently overridable from the
/// environment in this build; it follows `BugtriageConfig::from_env`'s
/// general default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    pub threshold: u32,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::default_recurrence_threshold(),
        }
    }
}
