//! Embedding cache and provider-chain counters.

use serde::{Deserialize, Serialize};

/// Tracks the two-tier embedding cache (L1 in-memory, L2 on-disk) hit
/// rate and how often the fallback chain had to skip the primary
/// provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingMetrics {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub misses: u64,
    pub fallback_count: u64,
}

impl EmbeddingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_l1_hit(&mut self) {
        self.l1_hits += 1;
    }

    pub fn record_l2_hit(&mut self) {
        self.l2_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    /// Combined L1+L2 hit rate over all embed calls.
    pub fn hit_rate(&self) -> f64 {
        let total = self.l1_hits + self.l2_hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.l1_hits + self.l2_hits) as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_with_no_calls() {
        assert_eq!(EmbeddingMetrics::new().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_counts_both_cache_tiers() {
        let mut metrics = EmbeddingMetrics::new();
        metrics.record_l1_hit();
        metrics.record_l2_hit();
        metrics.record_miss();
        assert!((metrics.hit_rate() - (2.0 / 3.0)).abs() < 1e-9);
    }
}
