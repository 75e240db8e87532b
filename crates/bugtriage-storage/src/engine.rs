//! StorageEngine — owns the ConnectionPool, implements IBugStorage,
//! startup migrations, pragma configuration.

use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::{AuditLog, Bug, DuplicateHistory, LowQualityQueue};
use bugtriage_core::models::bug::Status;
use bugtriage_core::traits::{BugSearchFilter, IBugStorage};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// The main storage engine. Owns the connection pool and implements the
/// full `IBugStorage` interface.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed: reads go through the read pool. In-memory: reads route
    /// through the writer, since in-memory read pool connections are
    /// isolated databases that can't see the writer's changes.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> BugtriageResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> BugtriageResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Bug/queue/history counts and SQLite page stats, surfaced on
    /// `/health`.
    pub fn health(&self) -> BugtriageResult<queries::maintenance::StorageHealthReport> {
        self.with_reader(queries::maintenance::storage_health)
    }

    fn initialize(&self) -> BugtriageResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    fn with_reader<F, T>(&self, f: F) -> BugtriageResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> BugtriageResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IBugStorage for StorageEngine {
    fn create_bug(&self, bug: &Bug) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::bug_crud::insert_bug(conn, bug))
    }

    fn get_bug(&self, id: Uuid) -> BugtriageResult<Option<Bug>> {
        self.with_reader(|conn| queries::bug_crud::get_bug(conn, &id.to_string()))
    }

    fn update_bug(&self, bug: &Bug) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::bug_crud::update_bug(conn, bug))
    }

    fn get_bugs(&self, ids: &[Uuid]) -> BugtriageResult<Vec<Bug>> {
        self.with_reader(|conn| queries::bug_query::bulk_get(conn, ids))
    }

    fn search_candidates(&self, product: &str) -> BugtriageResult<Vec<Bug>> {
        let product = if product.is_empty() { None } else { Some(product) };
        self.with_reader(|conn| queries::bug_query::search_candidates(conn, product))
    }

    fn bugs_by_status(&self, status: Status) -> BugtriageResult<Vec<Bug>> {
        self.with_reader(|conn| queries::bug_query::bugs_by_status(conn, status))
    }

    fn bugs_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BugtriageResult<Vec<Bug>> {
        self.with_reader(|conn| queries::bug_query::bugs_created_between(conn, from, to))
    }

    fn search_bugs(&self, filter: &BugSearchFilter) -> BugtriageResult<(Vec<Bug>, usize)> {
        self.with_reader(|conn| queries::bug_query::search_bugs(conn, filter))
    }

    fn duplicates_of(&self, parent_id: Uuid) -> BugtriageResult<Vec<Bug>> {
        self.with_reader(|conn| queries::bug_query::duplicates_of(conn, parent_id))
    }

    fn count_duplicates(&self, parent_id: Uuid) -> BugtriageResult<u32> {
        self.with_reader(|conn| queries::bug_query::count_duplicates(conn, parent_id))
    }

    fn has_cycle(&self, bug_id: Uuid, new_parent_id: Uuid) -> BugtriageResult<bool> {
        self.with_reader(|conn| queries::bug_query::has_cycle(conn, bug_id, new_parent_id))
    }

    fn count_blocked_duplicate_history(&self, parent_id: Uuid) -> BugtriageResult<u32> {
        self.with_reader(|conn| queries::bug_query::count_blocked_duplicate_history(conn, parent_id))
    }

    fn duplicate_history_for(&self, parent_id: Uuid) -> BugtriageResult<Vec<DuplicateHistory>> {
        self.with_reader(|conn| queries::duplicate_ops::duplicate_history_for(conn, parent_id))
    }

    fn record_duplicate_history(&self, history: &DuplicateHistory) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::duplicate_ops::record_duplicate_history(conn, history))
    }

    fn record_audit_log(&self, entry: &AuditLog) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::audit_ops::record_audit_log(conn, entry))
    }

    fn enqueue_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::quality_queue_ops::enqueue_low_quality(conn, entry))
    }

    fn get_low_quality(&self, id: Uuid) -> BugtriageResult<Option<LowQualityQueue>> {
        self.with_reader(|conn| queries::quality_queue_ops::get_low_quality(conn, id))
    }

    fn update_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::quality_queue_ops::update_low_quality(conn, entry))
    }

    fn pending_low_quality(&self) -> BugtriageResult<Vec<LowQualityQueue>> {
        self.with_reader(queries::quality_queue_ops::pending_low_quality)
    }

    fn get_cached_embedding(&self, content_hash: &str) -> BugtriageResult<Option<Vec<f32>>> {
        self.with_reader(|conn| queries::embedding_cache_ops::get_cached_embedding(conn, content_hash))
    }

    fn put_cached_embedding(&self, content_hash: &str, embedding: &[f32]) -> BugtriageResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::embedding_cache_ops::put_cached_embedding(conn, content_hash, embedding)
        })
    }

    fn vacuum(&self) -> BugtriageResult<()> {
        self.pool.writer.with_conn_sync(queries::maintenance::full_vacuum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugtriage_core::models::bug::{Classification, SubmissionContext};

    fn sample_bug() -> Bug {
        Bug {
            id: Uuid::new_v4(),
            title: "Login crash".to_string(),
            description: "Null pointer on login".to_string(),
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
            repro_steps: vec![],
            expected_result: None,
            actual_result: None,
            logs: None,
            quality_score: 1.0,
            embedding: Some(vec![1.0, 0.0, 0.0]),
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
    fn open_in_memory_runs_migrations() {
        let engine = StorageEngine::open_in_memory().unwrap();
        assert!(engine.vacuum().is_ok());
    }

    #[test]
    fn create_get_update_round_trip() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let bug = sample_bug();

        engine.create_bug(&bug).unwrap();
        let fetched = engine.get_bug(bug.id).unwrap().unwrap();
        assert_eq!(fetched.title, bug.title);

        let mut updated = fetched;
        updated.status = Status::Approved;
        engine.update_bug(&updated).unwrap();

        let refetched = engine.get_bug(bug.id).unwrap().unwrap();
        assert_eq!(refetched.status, Status::Approved);
    }

    #[test]
    fn search_candidates_filters_by_product() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut other = sample_bug();
        other.product = "web-app".to_string();

        engine.create_bug(&sample_bug()).unwrap();
        engine.create_bug(&other).unwrap();

        let results = engine.search_candidates("mobile-app").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product, "mobile-app");
    }

    #[test]
    fn search_bugs_filters_and_pages() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut web = sample_bug();
        web.product = "web-app".to_string();
        web.title = "Checkout button unresponsive".to_string();

        engine.create_bug(&sample_bug()).unwrap();
        engine.create_bug(&web).unwrap();

        let (results, total) = engine
            .search_bugs(&BugSearchFilter {
                product: Some("web-app".to_string()),
                limit: 10,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(results[0].product, "web-app");

        let (results, total) = engine
            .search_bugs(&BugSearchFilter {
                q: Some("login".to_string()),
                limit: 10,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(results[0].title, "Login crash");

        let (results, total) = engine
            .search_bugs(&BugSearchFilter {
                limit: 1,
                offset: 1,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn embedding_cache_round_trips_through_storage_engine() {
        let engine = StorageEngine::open_in_memory().unwrap();
        assert!(engine.get_cached_embedding("h1").unwrap().is_none());
        engine.put_cached_embedding("h1", &[1.0, 2.0]).unwrap();
        assert_eq!(engine.get_cached_embedding("h1").unwrap(), Some(vec![1.0, 2.0]));
    }
}
