use crate::errors::BugtriageResult;
use crate::models::{Bug, Submission};

/// Advisory rollup of how many metadata fields matched, not used by the
/// detector's thresholding — display/debugging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Which metadata fields agreed or disagreed between the submission and a
/// candidate, plus the derived advisory confidence level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetails {
    pub matching_fields: Vec<String>,
    pub differing_fields: Vec<String>,
    pub confidence_level: ConfidenceLevel,
}

/// A scored candidate bug returned by the similarity engine.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub bug: Bug,
    pub vector_score: f64,
    pub metadata_score: f64,
    pub hybrid_score: f64,
    pub is_cross_region: bool,
    pub match_details: MatchDetails,
}

/// Similarity-search seam implemented by the similarity crate. `embedding`
/// is computed once by the caller (C5) and reused here and for
/// persistence, so the engine never embeds on its own.
pub trait ISimilarityEngine: Send + Sync {
    fn find_similar(
        &self,
        submission: &Submission,
        embedding: &[f32],
        threshold: f64,
        top_k: usize,
    ) -> BugtriageResult<Vec<Candidate>>;
}
