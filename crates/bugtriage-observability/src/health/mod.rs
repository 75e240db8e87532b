//! Health reporting subsystem: snapshot in, report + recommendations out.

pub mod recommendations;
pub mod reporter;
pub mod subsystem_checks;

pub use recommendations::Recommendation;
pub use reporter::{HealthReporter, HealthSnapshot};

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::HealthReport;

/// Holds the most recently pushed [`HealthSnapshot`] and builds reports
/// from it on demand.
#[derive(Debug, Clone, Default)]
pub struct HealthChecker {
    snapshot: HealthSnapshot,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot, e.g. after the facade's periodic
    /// poll of storage and index counters.
    pub fn set_snapshot(&mut self, snapshot: HealthSnapshot) {
        self.snapshot = snapshot;
    }

    /// Build a report from the current snapshot.
    pub fn report(&self) -> BugtriageResult<HealthReport> {
        HealthReporter::build(&self.snapshot)
    }

    /// Recommendations derived from the current snapshot.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        HealthReporter::recommendations(&self.snapshot)
    }
}
