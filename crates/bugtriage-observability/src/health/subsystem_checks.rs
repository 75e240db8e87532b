//! Per-subsystem health checks: storage and vector index.

use bugtriage_core::models::{HealthStatus, SubsystemHealth};

use super::reporter::HealthSnapshot;

/// Runs health checks against each subsystem.
pub struct SubsystemChecker;

impl SubsystemChecker {
    /// Run all subsystem checks and return their statuses.
    pub fn check_all(snapshot: &HealthSnapshot) -> Vec<SubsystemHealth> {
        vec![Self::check_storage(snapshot), Self::check_vector_index(snapshot)]
    }

    /// Storage: unhealthy if the health query itself failed, degraded if
    /// fragmentation (free pages / total pages) exceeds 30%.
    fn check_storage(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = if !snapshot.storage_reachable {
            (HealthStatus::Unhealthy, Some("storage pool unreachable".into()))
        } else if snapshot.fragmentation_pct > 30.0 {
            (
                HealthStatus::Degraded,
                Some(format!(
                    "database is {:.0}% fragmented, consider a vacuum",
                    snapshot.fragmentation_pct
                )),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        SubsystemHealth {
            name: "storage".into(),
            status,
            message,
        }
    }

    /// Vector index: unhealthy if unreachable, degraded if it holds
    /// noticeably fewer vectors than there are bugs in storage — a sign
    /// some rows committed without making it into the index (see
    /// `Status::PendingReindex`) and a rebuild is overdue.
    fn check_vector_index(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = if !snapshot.index_reachable {
            (HealthStatus::Unhealthy, Some("vector index unreachable".into()))
        } else if snapshot.total_bugs > 0 && snapshot.vector_index_size * 10 < snapshot.total_bugs * 9 {
            (
                HealthStatus::Degraded,
                Some(format!(
                    "index holds {} vectors against {} bugs, a rebuild may be overdue",
                    snapshot.vector_index_size, snapshot.total_bugs
                )),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        SubsystemHealth {
            name: "vector_index".into(),
            status,
            message,
        }
    }
}
