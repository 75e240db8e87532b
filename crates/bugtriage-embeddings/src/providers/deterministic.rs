//! Deterministic feature-hashing / TF-IDF embedding provider.
//!
//! Generates fixed-dimension vectors from term frequency-inverse document
//! frequency scores. No external inference dependency — works in
//! air-gapped environments and is fully reproducible across runs, which
//! the duplicate-detection pipeline needs since a submission's embedding
//! must hash to the same vector whenever it is recomputed.

use std::collections::HashMap;

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::traits::IEmbeddingProvider;

/// Deterministic embedding provider. Produces dense vectors by hashing
/// terms into fixed-dimension buckets and weighting by term frequency.
/// Not as semantically rich as a neural embedding, but always available
/// and exactly reproducible.
pub struct DeterministicProvider {
    dimensions: usize,
}

impl DeterministicProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Build a TF-IDF vector for the given text. Empty or all-stopword
    /// text returns the all-zero sentinel vector.
    fn tfidf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];

        for (term, count) in &tf {
            let freq = count / total;
            // IDF approximation: weight longer, rarer-looking terms higher.
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl IEmbeddingProvider for DeterministicProvider {
    fn embed(&self, text: &str) -> BugtriageResult<Vec<f32>> {
        Ok(self.tfidf_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> BugtriageResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.tfidf_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "deterministic-hashing-v1"
    }

    fn is_available(&self) -> bool {
        true
    }
}
