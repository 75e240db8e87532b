use bugtriage_core::traits::IVectorIndex;
use bugtriage_index::VectorIndex;
use proptest::prelude::*;
use tempfile::tempdir;
use uuid::Uuid;

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[test]
fn search_on_empty_index_returns_no_matches() {
    let index = VectorIndex::new(8);
    let results = index.search(&[0.0; 8], 5).unwrap();
    assert!(results.is_empty());
}

#[test]
fn add_many_then_search_returns_requested_limit() {
    let index = VectorIndex::new(16);
    for _ in 0..50 {
        let v = normalize((0..16).map(|i| i as f32).collect());
        index.add(Uuid::new_v4(), &v).unwrap();
    }
    let query = normalize((0..16).map(|i| i as f32).collect());
    let results = index.search(&query, 10).unwrap();
    assert_eq!(results.len(), 10);
}

#[test]
fn rebuild_is_atomic_from_a_concurrent_reader_perspective() {
    let index = VectorIndex::new(4);
    let original_id = Uuid::new_v4();
    index.add(original_id, &[1.0, 0.0, 0.0, 0.0]).unwrap();

    let new_entries: Vec<(Uuid, Vec<f32>)> = (0..5)
        .map(|_| (Uuid::new_v4(), vec![0.0, 1.0, 0.0, 0.0]))
        .collect();
    index.rebuild(&new_entries).unwrap();

    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 10).unwrap();
    assert!(results.iter().all(|m| m.bug_id != original_id));
    assert_eq!(index.len(), 5);
}

#[test]
fn persist_and_reload_preserves_search_results() {
    let dir = tempdir().unwrap();
    let stem = dir.path().join("snap");

    let entries: Vec<(Uuid, Vec<f32>)> = (0..20)
        .map(|i| {
            let mut v = vec![0.0f32; 8];
            v[i % 8] = 1.0;
            (Uuid::new_v4(), v)
        })
        .collect();

    let before_ids: Vec<Uuid>;
    {
        let index = VectorIndex::with_persistence(8, &stem).unwrap();
        index.rebuild(&entries).unwrap();
        index.persist().unwrap();
        let mut query = vec![0.0f32; 8];
        query[0] = 1.0;
        before_ids = index
            .search(&query, 20)
            .unwrap()
            .into_iter()
            .map(|m| m.bug_id)
            .collect();
    }

    let reloaded = VectorIndex::with_persistence(8, &stem).unwrap();
    let mut query = vec![0.0f32; 8];
    query[0] = 1.0;
    let after_ids: Vec<Uuid> = reloaded
        .search(&query, 20)
        .unwrap()
        .into_iter()
        .map(|m| m.bug_id)
        .collect();

    assert_eq!(before_ids, after_ids);
}

proptest! {
    #[test]
    fn search_never_returns_more_than_limit(
        count in 0usize..30,
        limit in 1usize..10,
    ) {
        let index = VectorIndex::new(6);
        for _ in 0..count {
            let v = normalize((0..6).map(|i| (i + 1) as f32).collect());
            index.add(Uuid::new_v4(), &v).unwrap();
        }
        let query = normalize(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let results = index.search(&query, limit).unwrap();
        prop_assert!(results.len() <= limit.min(count));
    }

    #[test]
    fn rebuild_then_len_matches_entry_count(count in 0usize..40) {
        let index = VectorIndex::new(4);
        let entries: Vec<(Uuid, Vec<f32>)> = (0..count)
            .map(|_| (Uuid::new_v4(), vec![1.0, 0.0, 0.0, 0.0]))
            .collect();
        index.rebuild(&entries).unwrap();
        prop_assert_eq!(index.len(), count);
    }
}
