//! `EmbeddingEngine` — the main entry point for embedding generation.
//!
//! Coordinates provider selection, the fallback chain, and the two-tier
//! cache. Implements `IEmbeddingProvider` so it can be dropped in anywhere
//! a provider is expected.

use std::path::Path;

use bugtriage_core::config::EmbeddingConfig;
use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::DegradationEvent;
use bugtriage_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::CacheCoordinator;
use crate::degradation::DegradationChain;
use crate::providers::DeterministicProvider;

/// The main embedding engine. Wraps provider selection, caching, and
/// fallback into a single coherent interface.
pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: CacheCoordinator,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Build the default fallback chain: just the deterministic provider
    /// today (see the workspace design notes on the embedding-provider
    /// open question). `DeterministicProvider` never fails, so no other
    /// entry is needed to guarantee availability.
    fn default_chain(config: &EmbeddingConfig) -> DegradationChain {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(DeterministicProvider::new(config.vector_dimension)));
        chain
    }

    /// Create a new engine from configuration, with an in-memory-only L2
    /// cache tier.
    pub fn new(config: EmbeddingConfig) -> Self {
        let chain = Self::default_chain(&config);
        let cache = CacheCoordinator::new(config.l1_cache_size);

        info!(
            provider = chain.active_provider_name(),
            dims = config.vector_dimension,
            "embedding engine initialized"
        );

        Self {
            chain,
            cache,
            config,
        }
    }

    /// Create a new engine whose L2 cache tier is backed by a SQLite file
    /// next to `db_path`.
    pub fn with_disk_cache(config: EmbeddingConfig, db_path: &Path) -> Self {
        let chain = Self::default_chain(&config);
        let cache = CacheCoordinator::with_disk_backing(config.l1_cache_size, db_path);

        Self {
            chain,
            cache,
            config,
        }
    }

    /// Embed arbitrary text, checking the cache first and writing through
    /// on a miss. `text` is hashed with blake3 to form the cache key.
    pub fn embed_text(&mut self, text: &str) -> BugtriageResult<Vec<f32>> {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();

        let (cached, tier) = self.cache.get(&hash);
        if let Some(vec) = cached {
            debug!(hash = %hash, tier = ?tier, "embedding cache hit");
            return Ok(vec);
        }

        let (embedding, provider) = self.chain.embed(text)?;
        debug!(hash = %hash, provider, "embedding cache miss, computed fresh");
        self.cache.put(hash, &embedding);
        Ok(embedding)
    }

    /// Drain accumulated degradation events (fallback-chain telemetry).
    pub fn drain_degradation_events(&mut self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    /// Name of the currently active (first available) provider.
    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    /// Configured embedding dimensionality.
    pub fn dimensions(&self) -> usize {
        self.config.vector_dimension
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> BugtriageResult<Vec<f32>> {
        // The trait is defined as `&self`, but the chain needs `&mut self`
        // to record degradation events. Read-only callers get a result
        // with no event tracking; `embed_text` is preferred when a `&mut
        // EmbeddingEngine` is available.
        self.chain.embed_readonly(text)
    }

    fn embed_batch(&self, texts: &[String]) -> BugtriageResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.config.vector_dimension
    }

    fn name(&self) -> &str {
        "embedding-engine"
    }

    fn is_available(&self) -> bool {
        true
    }
}
