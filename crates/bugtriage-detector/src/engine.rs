//! `DuplicateDetector` — orchestrates quality → embed → search → decide →
//! write, strictly sequential within a submission. Quality runs before
//! similarity (short-circuit); the embedding is computed exactly once and
//! reused for both the search and the persisted row.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use bugtriage_core::config::SimilarityConfig;
use bugtriage_core::errors::{BugtriageError, BugtriageResult, DetectorError};
use bugtriage_core::models::audit_log::AuditEventType;
use bugtriage_core::models::bug::{Classification, Status};
use bugtriage_core::models::{AuditLog, Bug, DuplicateHistory, LowQualityQueue, QueueStatus, Submission};
use bugtriage_core::traits::{
    IBugStorage, IEmbeddingProvider, IQualityChecker, ISimilarityEngine, IVectorIndex,
};
use bugtriage_recurrence::RecurrenceTracker;

use crate::build::new_bug;
use crate::outcome::Outcome;

/// The orchestrator. Holds one trait-object handle per collaborating
/// subsystem so it can be assembled from any implementation — real or
/// test-fake — without a dependency on their concrete crates.
pub struct DuplicateDetector {
    quality: Arc<dyn IQualityChecker>,
    embedder: Arc<dyn IEmbeddingProvider>,
    similarity: Arc<dyn ISimilarityEngine>,
    index: Arc<dyn IVectorIndex>,
    storage: Arc<dyn IBugStorage>,
    recurrence: RecurrenceTracker,
    config: SimilarityConfig,
}

impl DuplicateDetector {
    pub fn new(
        quality: Arc<dyn IQualityChecker>,
        embedder: Arc<dyn IEmbeddingProvider>,
        similarity: Arc<dyn ISimilarityEngine>,
        index: Arc<dyn IVectorIndex>,
        storage: Arc<dyn IBugStorage>,
        recurrence: RecurrenceTracker,
        config: SimilarityConfig,
    ) -> Self {
        Self {
            quality,
            embedder,
            similarity,
            index,
            storage,
            recurrence,
            config,
        }
    }

    #[instrument(skip_all, fields(product = %submission.product))]
    pub fn process(&self, submission: Submission) -> BugtriageResult<Outcome> {
        let report = self.quality.check(&submission);
        if !report.is_valid {
            return self.flag_low_quality(submission, report.issues);
        }

        let text = submission.embedding_text();
        let embedding = self.embedder.embed(&text)?;

        let candidates = self.similarity.find_similar(
            &submission,
            &embedding,
            self.config.low_threshold,
            self.config.top_k,
        )?;

        match candidates.first() {
            None => self.create(submission, report.score, embedding),
            Some(best) if best.hybrid_score >= self.config.high_threshold => {
                self.block(submission, best.bug.id, best.hybrid_score)
            }
            Some(best) => {
                self.flag_duplicate(submission, report.score, embedding, best.bug.id, best.hybrid_score)
            }
        }
    }

    fn create(&self, submission: Submission, quality_score: f64, embedding: Vec<f32>) -> BugtriageResult<Outcome> {
        let bug = new_bug(
            &submission,
            quality_score,
            Some(embedding.clone()),
            None,
            None,
            Classification::None,
            Status::New,
        );
        self.storage.create_bug(&bug)?;

        if let Err(e) = self.index.add(bug.id, &embedding) {
            return Err(self.compensate(bug, e));
        }

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::BugCreated,
            bug_id: Some(bug.id),
            parent_id: None,
            actor: "system".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: None,
            new_state: Some("new".to_string()),
            created_at: Utc::now(),
        })?;

        info!(bug_id = %bug.id, "bug created");
        Ok(Outcome::Created(bug))
    }

    fn flag_duplicate(
        &self,
        submission: Submission,
        quality_score: f64,
        embedding: Vec<f32>,
        parent_id: Uuid,
        hybrid_score: f64,
    ) -> BugtriageResult<Outcome> {
        let bug = new_bug(
            &submission,
            quality_score,
            Some(embedding.clone()),
            Some(parent_id),
            Some(hybrid_score),
            Classification::Duplicate,
            Status::Duplicate,
        );
        self.storage.create_bug(&bug)?;

        if let Err(e) = self.index.add(bug.id, &embedding) {
            return Err(self.compensate(bug, e));
        }

        self.storage.record_duplicate_history(&DuplicateHistory {
            id: Uuid::new_v4(),
            original_id: parent_id,
            candidate_id: Some(bug.id),
            similarity_score: hybrid_score,
            method: "hybrid".to_string(),
            was_blocked: false,
            submission_snapshot: submission,
            detected_at: Utc::now(),
        })?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::DuplicateDetected,
            bug_id: Some(bug.id),
            parent_id: Some(parent_id),
            actor: "system".to_string(),
            ai_confidence: Some(hybrid_score),
            reasoning: Some(serde_json::json!({"hybrid_score": hybrid_score})),
            previous_state: None,
            new_state: Some("duplicate".to_string()),
            created_at: Utc::now(),
        })?;

        self.recurrence.track(parent_id, Some(bug.id))?;

        info!(bug_id = %bug.id, %parent_id, hybrid_score, "duplicate flagged");
        Ok(Outcome::FlaggedDuplicate { bug, parent_id })
    }

    fn block(&self, submission: Submission, parent_id: Uuid, hybrid_score: f64) -> BugtriageResult<Outcome> {
        self.storage.record_duplicate_history(&DuplicateHistory {
            id: Uuid::new_v4(),
            original_id: parent_id,
            candidate_id: None,
            similarity_score: hybrid_score,
            method: "hybrid".to_string(),
            was_blocked: true,
            submission_snapshot: submission,
            detected_at: Utc::now(),
        })?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::DuplicateBlocked,
            bug_id: None,
            parent_id: Some(parent_id),
            actor: "system".to_string(),
            ai_confidence: Some(hybrid_score),
            reasoning: Some(serde_json::json!({"hybrid_score": hybrid_score})),
            previous_state: None,
            new_state: Some("blocked".to_string()),
            created_at: Utc::now(),
        })?;

        self.recurrence.track(parent_id, None)?;

        info!(%parent_id, hybrid_score, "duplicate blocked");
        Ok(Outcome::BlockedDuplicate { parent_id })
    }

    fn flag_low_quality(&self, submission: Submission, issues: Vec<String>) -> BugtriageResult<Outcome> {
        let entry = LowQualityQueue {
            id: Uuid::new_v4(),
            submission,
            quality_issues: issues.into_iter().collect(),
            status: QueueStatus::Pending,
            reviewer: None,
            reviewed_at: None,
            created_bug_id: None,
            created_at: Utc::now(),
        };
        self.storage.enqueue_low_quality(&entry)?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::LowQualityFlagged,
            bug_id: None,
            parent_id: None,
            actor: "system".to_string(),
            ai_confidence: None,
            reasoning: Some(serde_json::json!({"issues": entry.quality_issues})),
            previous_state: None,
            new_state: Some("pending".to_string()),
            created_at: Utc::now(),
        })?;

        warn!(queue_id = %entry.id, "submission flagged low quality");
        Ok(Outcome::LowQuality(entry))
    }

    /// A row committed but the vector-index insert failed. Rather than
    /// leave an "indexed but absent from DB" or "in DB with embedding but
    /// not indexed" state, the row is marked `PendingReindex` so a later
    /// rebuild picks it back up. If even that compensating update fails,
    /// the returned error says so. Always returns an error — callers use
    /// it to short-circuit with `return Err(self.compensate(...))`.
    fn compensate(&self, mut bug: Bug, index_err: BugtriageError) -> BugtriageError {
        warn!(bug_id = %bug.id, error = %index_err, "index insert failed, compensating");
        bug.status = Status::PendingReindex;
        bug.updated_at = Utc::now();
        if let Err(update_err) = self.storage.update_bug(&bug) {
            return DetectorError::CompensationFailed {
                id: bug.id.to_string(),
                reason: format!(
                    "index error: {index_err}; compensation update also failed: {update_err}"
                ),
            }
            .into();
        }
        DetectorError::CompensationFailed {
            id: bug.id.to_string(),
            reason: index_err.to_string(),
        }
        .into()
    }

    // --- QA overrides ---

    /// Clears duplicate linkage, returning the bug to a first-class row.
    pub fn promote(&self, bug_id: Uuid) -> BugtriageResult<Bug> {
        let mut bug = self.get_bug_or_not_found(bug_id)?;
        if !bug.is_duplicate {
            return Err(DetectorError::NotADuplicate {
                id: bug_id.to_string(),
            }
            .into());
        }

        let previous = format!("{:?}", bug.classification);
        bug.is_duplicate = false;
        bug.duplicate_of = None;
        bug.classification = Classification::None;
        bug.similarity_score = None;
        bug.status = Status::New;
        bug.updated_at = Utc::now();
        self.storage.update_bug(&bug)?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::BugPromoted,
            bug_id: Some(bug_id),
            parent_id: None,
            actor: "qa".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: Some(previous),
            new_state: Some("new".to_string()),
            created_at: Utc::now(),
        })?;

        info!(%bug_id, "bug promoted out of duplicate status");
        Ok(bug)
    }

    /// Redirects `bug_id`'s `duplicate_of` to `new_parent_id`. The parent
    /// must exist and differ from `bug_id`, and the redirect must not
    /// close a cycle in the duplicate-of forest.
    pub fn reclassify(&self, bug_id: Uuid, new_parent_id: Uuid) -> BugtriageResult<Bug> {
        if bug_id == new_parent_id {
            return Err(DetectorError::SelfParent {
                id: bug_id.to_string(),
            }
            .into());
        }

        let mut bug = self.get_bug_or_not_found(bug_id)?;
        self.get_bug_or_not_found(new_parent_id)?;

        if self.storage.has_cycle(bug_id, new_parent_id)? {
            return Err(DetectorError::CycleDetected {
                from: bug_id.to_string(),
                to: new_parent_id.to_string(),
            }
            .into());
        }

        let previous = format!("{:?}", bug.duplicate_of);
        bug.duplicate_of = Some(new_parent_id);
        bug.classification = Classification::Duplicate;
        bug.is_duplicate = true;
        bug.status = Status::Duplicate;
        bug.updated_at = Utc::now();
        self.storage.update_bug(&bug)?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::ClassificationChanged,
            bug_id: Some(bug_id),
            parent_id: Some(new_parent_id),
            actor: "qa".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: Some(previous),
            new_state: Some(new_parent_id.to_string()),
            created_at: Utc::now(),
        })?;

        info!(%bug_id, %new_parent_id, "bug reclassified");
        Ok(bug)
    }

    /// Creates a Bug from a queued low-quality submission, generating and
    /// indexing its embedding as if it had passed the quality gate.
    pub fn approve_low_quality(&self, queue_id: Uuid, reviewer: Option<String>) -> BugtriageResult<Bug> {
        let mut entry = self.get_low_quality_or_not_found(queue_id)?;
        if entry.status != QueueStatus::Pending {
            return Err(DetectorError::AlreadyReviewed {
                id: queue_id.to_string(),
            }
            .into());
        }

        let text = entry.submission.embedding_text();
        let embedding = self.embedder.embed(&text)?;

        // The gate that originally rejected this submission didn't
        // persist its numeric score on the queue row, only the issue
        // codes; QA approval overrides the gate outright rather than
        // reinstating a score that was never saved.
        let bug = new_bug(
            &entry.submission,
            0.0,
            Some(embedding.clone()),
            None,
            None,
            Classification::None,
            Status::New,
        );
        self.storage.create_bug(&bug)?;

        if let Err(e) = self.index.add(bug.id, &embedding) {
            return Err(self.compensate(bug, e));
        }

        entry.status = QueueStatus::Approved;
        entry.reviewer = reviewer;
        entry.reviewed_at = Some(Utc::now());
        entry.created_bug_id = Some(bug.id);
        self.storage.update_low_quality(&entry)?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::QaOverride,
            bug_id: Some(bug.id),
            parent_id: None,
            actor: "qa".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: Some("pending".to_string()),
            new_state: Some("approved".to_string()),
            created_at: Utc::now(),
        })?;

        info!(%queue_id, bug_id = %bug.id, "low-quality submission approved");
        Ok(bug)
    }

    /// Terminal: no Bug is ever created for a rejected low-quality entry.
    pub fn reject_low_quality(&self, queue_id: Uuid, reviewer: Option<String>) -> BugtriageResult<()> {
        let mut entry = self.get_low_quality_or_not_found(queue_id)?;
        if entry.status != QueueStatus::Pending {
            return Err(DetectorError::AlreadyReviewed {
                id: queue_id.to_string(),
            }
            .into());
        }

        entry.status = QueueStatus::Rejected;
        entry.reviewer = reviewer;
        entry.reviewed_at = Some(Utc::now());
        self.storage.update_low_quality(&entry)?;

        self.storage.record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::QaOverride,
            bug_id: None,
            parent_id: None,
            actor: "qa".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: Some("pending".to_string()),
            new_state: Some("rejected".to_string()),
            created_at: Utc::now(),
        })?;

        info!(%queue_id, "low-quality submission rejected");
        Ok(())
    }

    fn get_bug_or_not_found(&self, id: Uuid) -> BugtriageResult<Bug> {
        self.storage.get_bug(id)?.ok_or_else(|| BugtriageError::NotFound {
            resource: "bug".to_string(),
            id: id.to_string(),
        })
    }

    fn get_low_quality_or_not_found(&self, id: Uuid) -> BugtriageResult<LowQualityQueue> {
        self.storage
            .get_low_quality(id)?
            .ok_or_else(|| BugtriageError::NotFound {
                resource: "low_quality_queue".to_string(),
                id: id.to_string(),
            })
    }
}
