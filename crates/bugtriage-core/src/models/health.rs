use serde::{Deserialize, Serialize};

/// Status of a single subsystem or of the aggregate report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of checking one subsystem (storage, vector index, embedding
/// provider chain).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsystemHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Counters surfaced alongside the overall status on `/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub total_bugs: usize,
    pub pending_low_quality: usize,
    pub total_duplicate_history: usize,
    pub db_size_bytes: u64,
    pub fragmentation_pct: f64,
    pub vector_index_size: usize,
    pub vector_index_dimensions: usize,
}

/// Aggregate health report returned by `GET /health`. The facade maps
/// `Healthy` to 200 and anything else (`Degraded` or `Unhealthy`) to 503.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub subsystems: Vec<SubsystemHealth>,
    pub metrics: HealthMetrics,
}
