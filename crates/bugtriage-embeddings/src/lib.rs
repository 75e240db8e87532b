//! # bugtriage-embeddings
//!
//! Deterministic text embedding with a fallback chain and a two-tier
//! cache, implementing `bugtriage_core::traits::IEmbeddingProvider`.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;

pub use cache::CacheCoordinator;
pub use degradation::DegradationChain;
pub use engine::EmbeddingEngine;
pub use providers::DeterministicProvider;
