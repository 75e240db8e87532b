/// Similarity-engine errors.
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("candidate search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("candidate bug {id} referenced by index but missing from storage")]
    DanglingCandidate { id: String },
}
