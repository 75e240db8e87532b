use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use bugtriage_core::config::{RecurrenceConfig, SimilarityConfig};
use bugtriage_core::errors::{BugtriageResult, IndexError};
use bugtriage_core::models::bug::{Classification, Status};
use bugtriage_core::models::{AuditLog, Bug, DuplicateHistory, LowQualityQueue, Submission};
use bugtriage_core::traits::{
    Candidate, ConfidenceLevel, IBugStorage, IEmbeddingProvider, IQualityChecker, ISimilarityEngine,
    IVectorIndex, MatchDetails, QualityReport,
};
use bugtriage_detector::{DuplicateDetector, Outcome};
use bugtriage_recurrence::RecurrenceTracker;

fn submission() -> Submission {
    Submission {
        title: "crash on launch".to_string(),
        description: "the app crashes immediately after launch on the home screen".to_string(),
        product: "mobile-app".to_string(),
        component: None,
        version: None,
        severity: None,
        environment: None,
        device: Some("Pixel 8".to_string()),
        os_version: None,
        build_version: Some("1.2.3".to_string()),
        region: Some("us".to_string()),
        reporter: None,
        repro_steps: vec!["open app".to_string()],
        expected_result: None,
        actual_result: None,
        logs: None,
        context: Default::default(),
    }
}

fn seed_bug(id: Uuid) -> Bug {
    Bug {
        id,
        title: "crash on launch".to_string(),
        description: "the app crashes immediately after launch on the home screen".to_string(),
        product: "mobile-app".to_string(),
        component: None,
        version: None,
        severity: None,
        environment: None,
        device: None,
        os_version: None,
        build_version: None,
        region: None,
        reporter: None,
        repro_steps: Vec::new(),
        expected_result: None,
        actual_result: None,
        logs: None,
        quality_score: 1.0,
        embedding: Some(vec![1.0, 0.0]),
        is_duplicate: false,
        duplicate_of: None,
        similarity_score: None,
        is_recurring: false,
        classification: Classification::None,
        status: Status::New,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        context: Default::default(),
    }
}

#[derive(Default)]
struct FakeStorage {
    bugs: Mutex<HashMap<Uuid, Bug>>,
    history: Mutex<Vec<DuplicateHistory>>,
    audit: Mutex<Vec<AuditLog>>,
    queue: Mutex<HashMap<Uuid, LowQualityQueue>>,
}

impl FakeStorage {
    fn with_bug(bug: Bug) -> Arc<Self> {
        let storage = Self::default();
        storage.bugs.lock().unwrap().insert(bug.id, bug);
        Arc::new(storage)
    }
}

impl IBugStorage for FakeStorage {
    fn create_bug(&self, bug: &Bug) -> BugtriageResult<()> {
        self.bugs.lock().unwrap().insert(bug.id, bug.clone());
        Ok(())
    }
    fn get_bug(&self, id: Uuid) -> BugtriageResult<Option<Bug>> {
        Ok(self.bugs.lock().unwrap().get(&id).cloned())
    }
    fn update_bug(&self, bug: &Bug) -> BugtriageResult<()> {
        self.bugs.lock().unwrap().insert(bug.id, bug.clone());
        Ok(())
    }
    fn get_bugs(&self, ids: &[Uuid]) -> BugtriageResult<Vec<Bug>> {
        let bugs = self.bugs.lock().unwrap();
        Ok(ids.iter().filter_map(|id| bugs.get(id).cloned()).collect())
    }
    fn search_candidates(&self, _product: &str) -> BugtriageResult<Vec<Bug>> {
        unimplemented!()
    }
    fn bugs_by_status(&self, _status: Status) -> BugtriageResult<Vec<Bug>> {
        unimplemented!()
    }
    fn bugs_created_between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> BugtriageResult<Vec<Bug>> {
        unimplemented!()
    }
    fn duplicates_of(&self, _parent_id: Uuid) -> BugtriageResult<Vec<Bug>> {
        unimplemented!()
    }
    fn count_duplicates(&self, parent_id: Uuid) -> BugtriageResult<u32> {
        Ok(self
            .bugs
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.duplicate_of == Some(parent_id) && !b.status.is_retired())
            .count() as u32)
    }
    fn has_cycle(&self, bug_id: Uuid, new_parent_id: Uuid) -> BugtriageResult<bool> {
        let bugs = self.bugs.lock().unwrap();
        let mut current = Some(new_parent_id);
        let mut steps = 0;
        while let Some(id) = current {
            if id == bug_id {
                return Ok(true);
            }
            current = bugs.get(&id).and_then(|b| b.duplicate_of);
            steps += 1;
            if steps > 64 {
                break;
            }
        }
        Ok(false)
    }
    fn count_blocked_duplicate_history(&self, parent_id: Uuid) -> BugtriageResult<u32> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.was_blocked && h.original_id == parent_id)
            .count() as u32)
    }
    fn duplicate_history_for(&self, parent_id: Uuid) -> BugtriageResult<Vec<DuplicateHistory>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.original_id == parent_id)
            .cloned()
            .collect())
    }
    fn search_bugs(
        &self,
        _filter: &bugtriage_core::traits::BugSearchFilter,
    ) -> BugtriageResult<(Vec<Bug>, usize)> {
        unimplemented!()
    }
    fn record_duplicate_history(&self, history: &DuplicateHistory) -> BugtriageResult<()> {
        self.history.lock().unwrap().push(history.clone());
        Ok(())
    }
    fn record_audit_log(&self, entry: &AuditLog) -> BugtriageResult<()> {
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }
    fn enqueue_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()> {
        self.queue.lock().unwrap().insert(entry.id, entry.clone());
        Ok(())
    }
    fn get_low_quality(&self, id: Uuid) -> BugtriageResult<Option<LowQualityQueue>> {
        Ok(self.queue.lock().unwrap().get(&id).cloned())
    }
    fn update_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()> {
        self.queue.lock().unwrap().insert(entry.id, entry.clone());
        Ok(())
    }
    fn pending_low_quality(&self) -> BugtriageResult<Vec<LowQualityQueue>> {
        unimplemented!()
    }
    fn get_cached_embedding(&self, _content_hash: &str) -> BugtriageResult<Option<Vec<f32>>> {
        Ok(None)
    }
    fn put_cached_embedding(&self, _content_hash: &str, _embedding: &[f32]) -> BugtriageResult<()> {
        Ok(())
    }
    fn vacuum(&self) -> BugtriageResult<()> {
        unimplemented!()
    }
}

struct FakeQuality {
    is_valid: bool,
}

impl IQualityChecker for FakeQuality {
    fn check(&self, _submission: &Submission) -> QualityReport {
        QualityReport {
            is_valid: self.is_valid,
            score: if self.is_valid { 0.9 } else { 0.1 },
            issues: if self.is_valid {
                Vec::new()
            } else {
                vec!["description_too_short".to_string()]
            },
        }
    }
}

struct FakeEmbedder;

impl IEmbeddingProvider for FakeEmbedder {
    fn embed(&self, _text: &str) -> BugtriageResult<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }
    fn embed_batch(&self, texts: &[String]) -> BugtriageResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
    fn dimensions(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "fake"
    }
    fn is_available(&self) -> bool {
        true
    }
}

struct FakeSimilarity {
    candidates: Vec<Candidate>,
}

impl ISimilarityEngine for FakeSimilarity {
    fn find_similar(
        &self,
        _submission: &Submission,
        _embedding: &[f32],
        _threshold: f64,
        _top_k: usize,
    ) -> BugtriageResult<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

fn candidate(bug: Bug, hybrid_score: f64) -> Candidate {
    Candidate {
        bug,
        vector_score: hybrid_score,
        metadata_score: hybrid_score,
        hybrid_score,
        is_cross_region: false,
        match_details: MatchDetails {
            matching_fields: vec!["title".to_string()],
            differing_fields: Vec::new(),
            confidence_level: ConfidenceLevel::High,
        },
    }
}

#[derive(Default)]
struct FakeIndex {
    vectors: Mutex<HashMap<Uuid, Vec<f32>>>,
    fail_next_add: Mutex<bool>,
}

impl FakeIndex {
    fn failing() -> Arc<Self> {
        let index = Self::default();
        *index.fail_next_add.lock().unwrap() = true;
        Arc::new(index)
    }
}

impl IVectorIndex for FakeIndex {
    fn add(&self, bug_id: Uuid, vector: &[f32]) -> BugtriageResult<()> {
        if std::mem::take(&mut *self.fail_next_add.lock().unwrap()) {
            return Err(IndexError::Unreachable {
                reason: "index unavailable".to_string(),
            }
            .into());
        }
        self.vectors.lock().unwrap().insert(bug_id, vector.to_vec());
        Ok(())
    }
    fn search(&self, _query: &[f32], _limit: usize) -> BugtriageResult<Vec<bugtriage_core::traits::IndexMatch>> {
        unimplemented!()
    }
    fn rebuild(&self, _entries: &[(Uuid, Vec<f32>)]) -> BugtriageResult<()> {
        unimplemented!()
    }
    fn persist(&self) -> BugtriageResult<()> {
        Ok(())
    }
    fn len(&self) -> usize {
        self.vectors.lock().unwrap().len()
    }
    fn dimensions(&self) -> usize {
        2
    }
}

fn detector(
    storage: Arc<FakeStorage>,
    similarity_candidates: Vec<Candidate>,
    quality_valid: bool,
    index: Arc<FakeIndex>,
) -> DuplicateDetector {
    let recurrence = RecurrenceTracker::new(storage.clone(), RecurrenceConfig { threshold: 3 });
    DuplicateDetector::new(
        Arc::new(FakeQuality { is_valid: quality_valid }),
        Arc::new(FakeEmbedder),
        Arc::new(FakeSimilarity {
            candidates: similarity_candidates,
        }),
        index,
        storage,
        recurrence,
        SimilarityConfig {
            high_threshold: 0.85,
            low_threshold: 0.70,
            cross_region_enabled: true,
            supported_regions: Vec::new(),
            top_k: 10,
        },
    )
}

#[test]
fn no_candidates_creates_a_new_bug() {
    let storage = Arc::new(FakeStorage::default());
    let det = detector(storage, Vec::new(), true, Arc::new(FakeIndex::default()));

    let outcome = det.process(submission()).unwrap();
    match outcome {
        Outcome::Created(bug) => assert_eq!(bug.status, Status::New),
        other => panic!("expected Created, got {other:?}"),
    }
}

#[test]
fn low_quality_submission_is_queued_not_created() {
    let storage = Arc::new(FakeStorage::default());
    let det = detector(storage, Vec::new(), false, Arc::new(FakeIndex::default()));

    let outcome = det.process(submission()).unwrap();
    match outcome {
        Outcome::LowQuality(entry) => assert!(!entry.quality_issues.is_empty()),
        other => panic!("expected LowQuality, got {other:?}"),
    }
}

#[test]
fn mid_range_score_flags_duplicate_and_links_parent() {
    let parent_id = Uuid::new_v4();
    let parent = seed_bug(parent_id);
    let storage = FakeStorage::with_bug(parent);
    let candidates = vec![candidate(seed_bug(parent_id), 0.75)];
    let det = detector(storage, candidates, true, Arc::new(FakeIndex::default()));

    let outcome = det.process(submission()).unwrap();
    match outcome {
        Outcome::FlaggedDuplicate { bug, parent_id: pid } => {
            assert_eq!(pid, parent_id);
            assert_eq!(bug.duplicate_of, Some(parent_id));
            assert_eq!(bug.classification, Classification::Duplicate);
        }
        other => panic!("expected FlaggedDuplicate, got {other:?}"),
    }
}

#[test]
fn high_score_blocks_without_creating_a_row() {
    let parent_id = Uuid::new_v4();
    let parent = seed_bug(parent_id);
    let storage = FakeStorage::with_bug(parent);
    let candidates = vec![candidate(seed_bug(parent_id), 0.95)];
    let det = detector(storage.clone(), candidates, true, Arc::new(FakeIndex::default()));

    let outcome = det.process(submission()).unwrap();
    match outcome {
        Outcome::BlockedDuplicate { parent_id: pid } => assert_eq!(pid, parent_id),
        other => panic!("expected BlockedDuplicate, got {other:?}"),
    }
    assert_eq!(storage.bugs.lock().unwrap().len(), 1, "no new row for a blocked submission");
}

#[test]
fn crossing_recurrence_threshold_promotes_parent_and_duplicate() {
    let parent_id = Uuid::new_v4();
    let storage = FakeStorage::with_bug(seed_bug(parent_id));
    // Two prior live duplicates already on the parent; this submission's
    // flag will be the third and should cross the threshold of 3.
    for _ in 0..2 {
        let mut dup = seed_bug(Uuid::new_v4());
        dup.duplicate_of = Some(parent_id);
        storage.bugs.lock().unwrap().insert(dup.id, dup);
    }
    let candidates = vec![candidate(seed_bug(parent_id), 0.75)];
    let det = detector(storage.clone(), candidates, true, Arc::new(FakeIndex::default()));

    let outcome = det.process(submission()).unwrap();
    let Outcome::FlaggedDuplicate { bug, parent_id: pid } = outcome else {
        panic!("expected FlaggedDuplicate");
    };

    let stored_parent = storage.get_bug(pid).unwrap().unwrap();
    assert!(stored_parent.is_recurring);
    assert_eq!(stored_parent.classification, Classification::Recurring);

    let stored_dup = storage.get_bug(bug.id).unwrap().unwrap();
    assert_eq!(stored_dup.classification, Classification::Recurring);
}

#[test]
fn failed_index_insert_marks_bug_pending_reindex() {
    let storage = Arc::new(FakeStorage::default());
    let det = detector(storage.clone(), Vec::new(), true, FakeIndex::failing());

    let err = det.process(submission()).unwrap_err();
    assert!(err.to_string().contains("PendingReindex") || err.to_string().contains("compensat"));

    let bugs = storage.bugs.lock().unwrap();
    let bug = bugs.values().next().expect("row committed despite index failure");
    assert_eq!(bug.status, Status::PendingReindex);
}

#[test]
fn promote_clears_duplicate_linkage() {
    let parent_id = Uuid::new_v4();
    let mut dup = seed_bug(Uuid::new_v4());
    dup.duplicate_of = Some(parent_id);
    dup.is_duplicate = true;
    dup.classification = Classification::Duplicate;
    dup.similarity_score = Some(0.8);
    let dup_id = dup.id;
    let storage = Arc::new(FakeStorage::default());
    storage.bugs.lock().unwrap().insert(dup_id, dup);

    let det = detector(storage.clone(), Vec::new(), true, Arc::new(FakeIndex::default()));
    let bug = det.promote(dup_id).unwrap();

    assert!(!bug.is_duplicate);
    assert!(bug.duplicate_of.is_none());
    assert_eq!(bug.classification, Classification::None);
    assert!(bug.similarity_score.is_none());
}

#[test]
fn promote_rejects_a_bug_that_is_not_a_duplicate() {
    let bug = seed_bug(Uuid::new_v4());
    let id = bug.id;
    let storage = FakeStorage::with_bug(bug);
    let det = detector(storage, Vec::new(), true, Arc::new(FakeIndex::default()));

    let err = det.promote(id).unwrap_err();
    assert!(err.to_string().contains("not currently a duplicate"));
}

#[test]
fn reclassify_rejects_self_parent() {
    let id = Uuid::new_v4();
    let storage = FakeStorage::with_bug(seed_bug(id));
    let det = detector(storage, Vec::new(), true, Arc::new(FakeIndex::default()));

    let err = det.reclassify(id, id).unwrap_err();
    assert!(err.to_string().contains("parent cannot equal self"));
}

#[test]
fn reclassify_rejects_a_cycle() {
    let a_id = Uuid::new_v4();
    let b_id = Uuid::new_v4();
    let mut a = seed_bug(a_id);
    a.duplicate_of = Some(b_id);
    let b = seed_bug(b_id);
    let storage = Arc::new(FakeStorage::default());
    storage.bugs.lock().unwrap().insert(a_id, a);
    storage.bugs.lock().unwrap().insert(b_id, b);

    let det = detector(storage, Vec::new(), true, Arc::new(FakeIndex::default()));
    // Redirecting b -> a would close the cycle a -> b -> a.
    let err = det.reclassify(b_id, a_id).unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn reclassify_redirects_duplicate_of() {
    let old_parent = Uuid::new_v4();
    let new_parent = Uuid::new_v4();
    let mut dup = seed_bug(Uuid::new_v4());
    dup.duplicate_of = Some(old_parent);
    let dup_id = dup.id;
    let storage = Arc::new(FakeStorage::default());
    storage.bugs.lock().unwrap().insert(dup_id, dup);
    storage.bugs.lock().unwrap().insert(old_parent, seed_bug(old_parent));
    storage.bugs.lock().unwrap().insert(new_parent, seed_bug(new_parent));

    let det = detector(storage, Vec::new(), true, Arc::new(FakeIndex::default()));
    let bug = det.reclassify(dup_id, new_parent).unwrap();
    assert_eq!(bug.duplicate_of, Some(new_parent));
}

#[test]
fn approve_low_quality_creates_a_bug_and_marks_the_queue_entry() {
    let storage = Arc::new(FakeStorage::default());
    let entry = LowQualityQueue {
        id: Uuid::new_v4(),
        submission: submission(),
        quality_issues: Default::default(),
        status: bugtriage_core::models::QueueStatus::Pending,
        reviewer: None,
        reviewed_at: None,
        created_bug_id: None,
        created_at: Utc::now(),
    };
    let entry_id = entry.id;
    storage.queue.lock().unwrap().insert(entry_id, entry);

    let det = detector(storage.clone(), Vec::new(), true, Arc::new(FakeIndex::default()));
    let bug = det.approve_low_quality(entry_id, Some("qa-1".to_string())).unwrap();

    let stored_entry = storage.get_low_quality(entry_id).unwrap().unwrap();
    assert_eq!(stored_entry.status, bugtriage_core::models::QueueStatus::Approved);
    assert_eq!(stored_entry.created_bug_id, Some(bug.id));
}

#[test]
fn reject_low_quality_is_terminal() {
    let storage = Arc::new(FakeStorage::default());
    let entry = LowQualityQueue {
        id: Uuid::new_v4(),
        submission: submission(),
        quality_issues: Default::default(),
        status: bugtriage_core::models::QueueStatus::Pending,
        reviewer: None,
        reviewed_at: None,
        created_bug_id: None,
        created_at: Utc::now(),
    };
    let entry_id = entry.id;
    storage.queue.lock().unwrap().insert(entry_id, entry);

    let det = detector(storage.clone(), Vec::new(), true, Arc::new(FakeIndex::default()));
    det.reject_low_quality(entry_id, None).unwrap();

    let err = det.reject_low_quality(entry_id, None).unwrap_err();
    assert!(err.to_string().contains("already reviewed"));
}
