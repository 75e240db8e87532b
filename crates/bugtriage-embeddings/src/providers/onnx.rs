//! Neural embedding provider, feature-gated behind `onnx`. Scaffolding
//! only: not constructed by `default_chain()` and not exercised by any
//! test. A future model-backed provider would load a session here with
//! `ort` and fill in `embed`/`embed_batch`.

use bugtriage_core::errors::{BugtriageResult, EmbeddingError};
use bugtriage_core::traits::IEmbeddingProvider;

pub struct OnnxProvider {
    model_path: String,
    dimensions: usize,
}

impl OnnxProvider {
    pub fn new(model_path: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_path: model_path.into(),
            dimensions,
        }
    }
}

impl IEmbeddingProvider for OnnxProvider {
    fn embed(&self, _text: &str) -> BugtriageResult<Vec<f32>> {
        Err(EmbeddingError::InferenceFailed {
            reason: format!("onnx provider at {} is not wired up", self.model_path),
        }
        .into())
    }

    fn embed_batch(&self, texts: &[String]) -> BugtriageResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "onnx"
    }

    fn is_available(&self) -> bool {
        false
    }
}
