//! Per-outcome counters for the duplicate-detection pipeline.

use serde::{Deserialize, Serialize};

/// Counts of each `Outcome` the detector has produced since the last
/// reset, plus the compensation path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub created: u64,
    pub flagged_duplicate: u64,
    pub blocked_duplicate: u64,
    pub low_quality: u64,
    pub index_insert_compensated: u64,
    pub recurrence_promotions: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self) {
        self.created += 1;
    }

    pub fn record_flagged_duplicate(&mut self) {
        self.flagged_duplicate += 1;
    }

    pub fn record_blocked_duplicate(&mut self) {
        self.blocked_duplicate += 1;
    }

    pub fn record_low_quality(&mut self) {
        self.low_quality += 1;
    }

    pub fn record_compensation(&mut self) {
        self.index_insert_compensated += 1;
    }

    pub fn record_recurrence_promotion(&mut self) {
        self.recurrence_promotions += 1;
    }

    /// Total submissions processed, across all outcomes.
    pub fn total_processed(&self) -> u64 {
        self.created + self.flagged_duplicate + self.blocked_duplicate + self.low_quality
    }

    /// Fraction of created+flagged+blocked submissions that were some
    /// form of duplicate (flagged or blocked). `None` if nothing routable
    /// has been processed yet.
    pub fn duplicate_rate(&self) -> Option<f64> {
        let routable = self.created + self.flagged_duplicate + self.blocked_duplicate;
        if routable == 0 {
            return None;
        }
        Some((self.flagged_duplicate + self.blocked_duplicate) as f64 / routable as f64)
    }
}
