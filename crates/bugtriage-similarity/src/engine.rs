//! SimilarityEngine: implements `ISimilarityEngine`, orchestrates the
//! vector-neighbor fetch → candidate load → metadata scoring → hybrid
//! ranking pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use bugtriage_core::constants::{
    CANDIDATE_PREFILTER_FACTOR, CROSS_REGION_PENALTY, METADATA_SCORE_WEIGHT, VECTOR_SCORE_WEIGHT,
};
use bugtriage_core::errors::{BugtriageResult, SimilarityError};
use bugtriage_core::traits::{
    Candidate, ConfidenceLevel, IBugStorage, ISimilarityEngine, IVectorIndex, MatchDetails,
};
use bugtriage_core::models::Submission;

use crate::metadata;

pub struct SimilarityEngine {
    storage: Arc<dyn IBugStorage>,
    index: Arc<dyn IVectorIndex>,
}

impl SimilarityEngine {
    pub fn new(storage: Arc<dyn IBugStorage>, index: Arc<dyn IVectorIndex>) -> Self {
        Self { storage, index }
    }

    /// Deduplicate index hits by id, keeping the maximum vector score per
    /// id — the index's own contract allows transient duplicates during a
    /// concurrent rebuild.
    fn dedup_by_max_score(matches: Vec<bugtriage_core::traits::IndexMatch>) -> HashMap<Uuid, f64> {
        let mut best: HashMap<Uuid, f64> = HashMap::new();
        for m in matches {
            best.entry(m.bug_id)
                .and_modify(|score| {
                    if m.vector_score > *score {
                        *score = m.vector_score;
                    }
                })
                .or_insert(m.vector_score);
        }
        best
    }

    fn build_candidate(
        &self,
        submission: &Submission,
        bug_id: Uuid,
        vector_score: f64,
    ) -> BugtriageResult<Option<Candidate>> {
        let bug = self
            .storage
            .get_bug(bug_id)?
            .ok_or_else(|| SimilarityError::DanglingCandidate {
                id: bug_id.to_string(),
            })?;

        if !bug.is_search_candidate() {
            return Ok(None);
        }

        let (metadata_score, matching_fields, differing_fields) = metadata::score(submission, &bug);
        let mut hybrid_score = VECTOR_SCORE_WEIGHT * vector_score + METADATA_SCORE_WEIGHT * metadata_score;

        let is_cross_region = match (&submission.region, &bug.region) {
            (Some(a), Some(b)) if !a.eq_ignore_ascii_case(b) => true,
            _ => false,
        };
        if is_cross_region {
            hybrid_score = (hybrid_score - CROSS_REGION_PENALTY).max(0.0);
        }

        let confidence_level = if matching_fields.len() >= 3 {
            ConfidenceLevel::High
        } else if !matching_fields.is_empty() {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };

        Ok(Some(Candidate {
            bug,
            vector_score,
            metadata_score,
            hybrid_score,
            is_cross_region,
            match_details: MatchDetails {
                matching_fields,
                differing_fields,
                confidence_level,
            },
        }))
    }
}

impl ISimilarityEngine for SimilarityEngine {
    fn find_similar(
        &self,
        submission: &Submission,
        embedding: &[f32],
        threshold: f64,
        top_k: usize,
    ) -> BugtriageResult<Vec<Candidate>> {
        let neighbors = self.index.search(embedding, top_k * 2)?;
        let deduped = Self::dedup_by_max_score(neighbors);

        let mut candidates = Vec::with_capacity(deduped.len());
        for (bug_id, vector_score) in deduped {
            if let Some(candidate) = self.build_candidate(submission, bug_id, vector_score)? {
                candidates.push(candidate);
            }
        }

        let pre_filter_cutoff = CANDIDATE_PREFILTER_FACTOR * threshold;
        candidates.retain(|c| c.hybrid_score >= pre_filter_cutoff);

        candidates.sort_by(|a, b| {
            b.hybrid_score
                .partial_cmp(&a.hybrid_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);

        candidates.retain(|c| c.hybrid_score >= threshold);

        debug!(
            returned = candidates.len(),
            threshold, top_k, "similarity search complete"
        );

        Ok(candidates)
    }
}
