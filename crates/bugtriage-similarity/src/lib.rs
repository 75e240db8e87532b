//! # bugtriage-similarity
//!
//! Hybrid similarity search: blends vector-neighborhood ranking from the
//! vector index with metadata compatibility scoring, producing the
//! ranked candidates the duplicate detector thresholds against.

pub mod engine;
pub mod metadata;

pub use engine::SimilarityEngine;
