//! Central metrics registry.
//!
//! [`MetricsCollector`] owns all domain-specific metric collectors and provides
//! a unified interface for recording and querying metrics.

pub mod embedding_metrics;
pub mod index_metrics;
pub mod pipeline_metrics;

pub use embedding_metrics::EmbeddingMetrics;
pub use index_metrics::IndexMetrics;
pub use pipeline_metrics::PipelineMetrics;

/// Central metrics registry that owns all domain-specific collectors.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsCollector {
    pub pipeline: PipelineMetrics,
    pub embedding: EmbeddingMetrics,
    pub index: IndexMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics (useful for testing or periodic rotation).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_all_sub_collectors() {
        let collector = MetricsCollector::new();
        let json = serde_json::to_value(&collector).unwrap();
        assert!(json.get("pipeline").is_some());
        assert!(json.get("embedding").is_some());
        assert!(json.get("index").is_some());
    }
}
