use bugtriage_core::models::bug::{Classification, Status, SubmissionContext};
use bugtriage_core::models::{AuditLog, Bug, DuplicateHistory, LowQualityQueue, Submission};
use bugtriage_core::traits::IBugStorage;
use bugtriage_storage::StorageEngine;
use chrono::Utc;
use tempfile::tempdir;
use uuid::Uuid;

fn sample_bug(product: &str) -> Bug {
    Bug {
        id: Uuid::new_v4(),
        title: "App won't start".to_string(),
        description: "Crashes on launch with null pointer".to_string(),
        product: product.to_string(),
        component: Some("startup".to_string()),
        version: Some("3.1.0".to_string()),
        severity: None,
        environment: None,
        device: None,
        os_version: None,
        build_version: Some("2024.3".to_string()),
        region: Some("US".to_string()),
        reporter: Some("qa-alice".to_string()),
        repro_steps: vec!["install".to_string(), "open".to_string()],
        expected_result: None,
        actual_result: None,
        logs: None,
        quality_score: 0.9,
        embedding: Some(vec![1.0, 0.0, 0.0, 0.0]),
        is_duplicate: false,
        duplicate_of: None,
        similarity_score: None,
        is_recurring: false,
        classification: Classification::None,
        status: Status::New,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        context: SubmissionContext::default(),
    }
}

#[test]
fn file_backed_engine_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bugs.db");

    let bug_id;
    {
        let engine = StorageEngine::open(&path).unwrap();
        let bug = sample_bug("mobile-app");
        bug_id = bug.id;
        engine.create_bug(&bug).unwrap();
    }

    let engine = StorageEngine::open(&path).unwrap();
    let fetched = engine.get_bug(bug_id).unwrap().unwrap();
    assert_eq!(fetched.product, "mobile-app");
}

#[test]
fn duplicate_graph_tracks_children_and_counts() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let parent = sample_bug("mobile-app");
    engine.create_bug(&parent).unwrap();

    let mut dup = sample_bug("mobile-app");
    dup.status = Status::Duplicate;
    dup.classification = Classification::Duplicate;
    dup.is_duplicate = true;
    dup.duplicate_of = Some(parent.id);
    dup.similarity_score = Some(0.88);
    engine.create_bug(&dup).unwrap();

    let children = engine.duplicates_of(parent.id).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, dup.id);
    assert_eq!(engine.count_duplicates(parent.id).unwrap(), 1);

    assert!(engine.has_cycle(parent.id, dup.id).unwrap());
    assert!(!engine.has_cycle(parent.id, Uuid::new_v4()).unwrap());
}

#[test]
fn low_quality_queue_workflow() {
    let engine = StorageEngine::open_in_memory().unwrap();

    let entry = LowQualityQueue {
        id: Uuid::new_v4(),
        submission: Submission {
            title: "x".into(),
            description: "too short".into(),
            product: "web-app".into(),
            component: None,
            version: None,
            severity: None,
            environment: None,
            device: None,
            os_version: None,
            build_version: None,
            region: None,
            reporter: None,
            repro_steps: vec![],
            expected_result: None,
            actual_result: None,
            logs: None,
            context: Default::default(),
        },
        quality_issues: ["title_too_short".to_string()].into_iter().collect(),
        status: bugtriage_core::models::low_quality_queue::QueueStatus::Pending,
        reviewer: None,
        reviewed_at: None,
        created_bug_id: None,
        created_at: Utc::now(),
    };

    engine.enqueue_low_quality(&entry).unwrap();
    assert_eq!(engine.pending_low_quality().unwrap().len(), 1);

    let mut approved = engine.get_low_quality(entry.id).unwrap().unwrap();
    approved.status = bugtriage_core::models::low_quality_queue::QueueStatus::Approved;
    approved.reviewer = Some("qa-bob".to_string());
    approved.reviewed_at = Some(Utc::now());
    engine.update_low_quality(&approved).unwrap();

    assert!(engine.pending_low_quality().unwrap().is_empty());
}

#[test]
fn audit_and_duplicate_history_are_append_only_logs() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let bug = sample_bug("mobile-app");
    engine.create_bug(&bug).unwrap();

    engine
        .record_audit_log(&AuditLog {
            id: Uuid::new_v4(),
            event_type: bugtriage_core::models::AuditEventType::BugCreated,
            bug_id: Some(bug.id),
            parent_id: None,
            actor: "system".to_string(),
            ai_confidence: None,
            reasoning: None,
            previous_state: None,
            new_state: Some("new".to_string()),
            created_at: Utc::now(),
        })
        .unwrap();

    engine
        .record_duplicate_history(&DuplicateHistory {
            id: Uuid::new_v4(),
            original_id: bug.id,
            candidate_id: None,
            similarity_score: 0.95,
            method: "hybrid".to_string(),
            was_blocked: true,
            submission_snapshot: Submission {
                title: bug.title.clone(),
                description: bug.description.clone(),
                product: bug.product.clone(),
                component: None,
                version: None,
                severity: None,
                environment: None,
                device: None,
                os_version: None,
                build_version: None,
                region: None,
                reporter: None,
                repro_steps: vec![],
                expected_result: None,
                actual_result: None,
                logs: None,
                context: Default::default(),
            },
            detected_at: Utc::now(),
        })
        .unwrap();
}

#[test]
fn search_candidates_excludes_retired_bugs() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut closed = sample_bug("mobile-app");
    closed.status = Status::Closed;
    engine.create_bug(&closed).unwrap();

    let open = sample_bug("mobile-app");
    engine.create_bug(&open).unwrap();

    let candidates = engine.search_candidates("mobile-app").unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, open.id);
}
