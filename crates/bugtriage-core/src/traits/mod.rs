//! Trait seams every other crate in the workspace builds against. Keeping
//! these in the foundation crate means the detector can be assembled from
//! any combination of implementations without a dependency cycle.

pub mod embedding;
pub mod index;
pub mod quality;
pub mod similarity;
pub mod storage;

pub use embedding::IEmbeddingProvider;
pub use index::{IVectorIndex, IndexMatch};
pub use quality::{IQualityChecker, QualityReport};
pub use similarity::{Candidate, ConfidenceLevel, ISimilarityEngine, MatchDetails};
pub use storage::{BugSearchFilter, IBugStorage};
