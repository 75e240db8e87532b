//! Fallback chain for embedding generation.
//!
//! Chain: ONNX → fallback model → cached embeddings → TF-IDF → error.
//! Every fallback is logged to the degradation log.

use bugtriage_core::errors::{BugtriageResult, EmbeddingError};
use bugtriage_core::models::DegradationEvent;
use bugtriage_core::traits::IEmbeddingProvider;
use chrono::Utc;
use tracing::warn;

/// A provider entry in the fallback chain.
struct ChainEntry {
    provider: Box<dyn IEmbeddingProvider>,
}

/// Manages the degradation fallback chain for embedding providers.
///
/// Tries providers in order. On failure, logs a degradation event and
/// moves to the next provider.
pub struct DegradationChain {
    chain: Vec<ChainEntry>,
    /// Accumulated degradation events for the current session.
    events: Vec<DegradationEvent>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    /// Create a new chain with the given providers in priority order.
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(ChainEntry { provider });
    }

    /// Add a cache-only fallback provider.
    pub fn push_cache_fallback(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(ChainEntry { provider });
    }

    /// D-02: Try to embed using the chain without mutation (no event tracking).
    /// Used by the `IEmbeddingProvider` trait impl which requires `&self`.
    pub fn embed_readonly(&self, text: &str) -> BugtriageResult<Vec<f32>> {
        for entry in &self.chain {
            if !entry.provider.is_available() {
                continue;
            }
            match entry.provider.embed(text) {
                Ok(embedding) => return Ok(embedding),
                Err(_) => continue,
            }
        }
        Err(EmbeddingError::ProviderUnavailable {
            provider: format!("all {} providers failed", self.chain.len()),
        }
        .into())
    }

    /// Try to embed text using the fallback chain.
    ///
    /// Returns the embedding from the first successful provider.
    /// Logs a `DegradationEvent` for each fallback.
    pub fn embed(&mut self, text: &str) -> BugtriageResult<(Vec<f32>, &str)> {
        let mut last_error = None;

        for (i, entry) in self.chain.iter().enumerate() {
            if !entry.provider.is_available() {
                continue;
            }

            match entry.provider.embed(text) {
                Ok(vec) => {
                    if i > 0 {
                        // We fell back — log it.
                        let primary_name = self
                            .chain
                            .first()
                            .map(|e| e.provider.name())
                            .unwrap_or("unknown");
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: entry.provider.name().to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vec, entry.provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = entry.provider.name(),
                        error = %e,
                        "provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: "all providers exhausted".to_string(),
            }
            .into()
        }))
    }

    /// Try to embed a batch using the fallback chain.
    pub fn embed_batch(&mut self, texts: &[String]) -> BugtriageResult<(Vec<Vec<f32>>, &str)> {
        let mut last_error = None;

        for (i, entry) in self.chain.iter().enumerate() {
            if !entry.provider.is_available() {
                continue;
            }

            match entry.provider.embed_batch(texts) {
                Ok(vecs) => {
                    if i > 0 {
                        let primary_name = self
                            .chain
                            .first()
                            .map(|e| e.provider.name())
                            .unwrap_or("unknown");
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: entry.provider.name().to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vecs, entry.provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = entry.provider.name(),
                        error = %e,
                        "batch embed failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: "all providers exhausted".to_string(),
            }
            .into()
        }))
    }

    /// Get the name of the currently active (first available) provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|e| e.provider.is_available())
            .map(|e| e.provider.name())
            .unwrap_or("none")
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&mut self) -> Vec<DegradationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
