//! Aggregate health report generation.

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::{HealthMetrics, HealthReport, HealthStatus, SubsystemHealth};

use super::recommendations::Recommendation;
use super::subsystem_checks::SubsystemChecker;

/// Snapshot of subsystem data used to build a health report. The caller
/// (the service facade) populates this from `StorageHealthReport` and the
/// vector index's own counters; this crate never touches either directly.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub storage_reachable: bool,
    pub total_bugs: usize,
    pub pending_low_quality: usize,
    pub total_duplicate_history: usize,
    pub db_size_bytes: u64,
    pub fragmentation_pct: f64,
    pub index_reachable: bool,
    pub vector_index_size: usize,
    pub vector_index_dimensions: usize,
}

/// Builds a [`HealthReport`] from a snapshot and subsystem checks.
pub struct HealthReporter;

impl HealthReporter {
    /// Generate a full health report from the given snapshot.
    pub fn build(snapshot: &HealthSnapshot) -> BugtriageResult<HealthReport> {
        let subsystems = SubsystemChecker::check_all(snapshot);
        let overall_status = Self::derive_overall(&subsystems);

        Ok(HealthReport {
            overall_status,
            subsystems,
            metrics: HealthMetrics {
                total_bugs: snapshot.total_bugs,
                pending_low_quality: snapshot.pending_low_quality,
                total_duplicate_history: snapshot.total_duplicate_history,
                db_size_bytes: snapshot.db_size_bytes,
                fragmentation_pct: snapshot.fragmentation_pct,
                vector_index_size: snapshot.vector_index_size,
                vector_index_dimensions: snapshot.vector_index_dimensions,
            },
        })
    }

    /// Generate recommendations alongside the report.
    pub fn recommendations(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
        super::recommendations::generate(snapshot)
    }

    /// Derive overall status: unhealthy if any subsystem is unhealthy,
    /// degraded if any is degraded, otherwise healthy.
    fn derive_overall(subsystems: &[SubsystemHealth]) -> HealthStatus {
        let mut worst = HealthStatus::Healthy;
        for s in subsystems {
            match s.status {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }
}
