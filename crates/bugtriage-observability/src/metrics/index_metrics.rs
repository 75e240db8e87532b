//! Vector-index insert/rebuild counters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tracks index inserts, rebuilds, and search latency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMetrics {
    pub inserts: u64,
    pub rebuilds: u64,
    #[serde(skip, default)]
    search_latencies: Vec<Duration>,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_rebuild(&mut self) {
        self.rebuilds += 1;
    }

    pub fn record_search(&mut self, latency: Duration) {
        self.search_latencies.push(latency);
    }

    pub fn avg_search_latency(&self) -> Duration {
        if self.search_latencies.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.search_latencies.iter().sum();
        total / self.search_latencies.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avg_search_latency_is_zero_with_no_searches() {
        assert_eq!(IndexMetrics::new().avg_search_latency(), Duration::ZERO);
    }

    #[test]
    fn avg_search_latency_averages_recorded_samples() {
        let mut metrics = IndexMetrics::new();
        metrics.record_search(Duration::from_millis(10));
        metrics.record_search(Duration::from_millis(30));
        assert_eq!(metrics.avg_search_latency(), Duration::from_millis(20));
    }
}
