use crate::errors::BugtriageResult;

/// Embedding generation provider. Implementations must be deterministic
/// for a given text and crate version (see constants::VERSION in cache
/// keys) and must return unit-norm vectors.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a unit-norm vector of `dimensions()`
    /// floats. An empty `text` returns the all-zero sentinel vector.
    fn embed(&self, text: &str) -> BugtriageResult<Vec<f32>>;

    /// Embed a batch of texts, one vector per input in the same order.
    fn embed_batch(&self, texts: &[String]) -> BugtriageResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name, used in degradation-event logging.
    fn name(&self) -> &str;

    /// Whether this provider is currently available to serve requests.
    fn is_available(&self) -> bool;
}
