use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded whenever the embedding fallback chain skips a provider and
/// falls through to the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
