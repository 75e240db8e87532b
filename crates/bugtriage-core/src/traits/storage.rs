use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::BugtriageResult;
use crate::models::bug::Severity;
use crate::models::{AuditLog, Bug, DuplicateHistory, LowQualityQueue, Status};

/// Filters for the `GET /api/bugs/search` endpoint. `q` matches
/// case-insensitively against title and description; every other field is
/// an exact match. `limit`/`offset` page the result.
#[derive(Debug, Clone, Default)]
pub struct BugSearchFilter {
    pub q: Option<String>,
    pub product: Option<String>,
    pub status: Option<Status>,
    pub severity: Option<Severity>,
    pub limit: usize,
    pub offset: usize,
}

/// Persistence seam implemented by the storage crate. Everything above
/// this trait (detector, recurrence tracker, facade) depends only on this
/// interface, never on `rusqlite` directly.
pub trait IBugStorage: Send + Sync {
    // --- CRUD ---
    fn create_bug(&self, bug: &Bug) -> BugtriageResult<()>;
    fn get_bug(&self, id: Uuid) -> BugtriageResult<Option<Bug>>;
    fn update_bug(&self, bug: &Bug) -> BugtriageResult<()>;

    // --- Bulk ---
    fn get_bugs(&self, ids: &[Uuid]) -> BugtriageResult<Vec<Bug>>;

    // --- Query ---
    /// All bugs eligible as similarity candidates (see
    /// `Bug::is_search_candidate`), optionally narrowed to a product.
    fn search_candidates(&self, product: &str) -> BugtriageResult<Vec<Bug>>;
    fn bugs_by_status(&self, status: Status) -> BugtriageResult<Vec<Bug>>;
    fn bugs_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BugtriageResult<Vec<Bug>>;
    /// Paged, filtered bug search for the facade's search endpoint.
    /// Returns the page alongside the total match count (pre-paging).
    fn search_bugs(&self, filter: &BugSearchFilter) -> BugtriageResult<(Vec<Bug>, usize)>;

    // --- Duplicate graph ---
    /// Direct duplicates whose `duplicate_of` points at `parent_id`.
    fn duplicates_of(&self, parent_id: Uuid) -> BugtriageResult<Vec<Bug>>;
    /// Count of live (non-retired) duplicates on `parent_id`, used by the
    /// recurrence tracker's threshold check.
    fn count_duplicates(&self, parent_id: Uuid) -> BugtriageResult<u32>;
    /// Whether redirecting `bug_id`'s `duplicate_of` to `new_parent_id`
    /// would introduce a cycle in the duplicate-of forest.
    fn has_cycle(&self, bug_id: Uuid, new_parent_id: Uuid) -> BugtriageResult<bool>;
    /// Count of `duplicate_history` rows with `was_blocked = true`
    /// referencing `parent_id`, used alongside `count_duplicates` by the
    /// recurrence tracker's threshold check.
    fn count_blocked_duplicate_history(&self, parent_id: Uuid) -> BugtriageResult<u32>;
    /// All `duplicate_history` rows referencing `parent_id` as
    /// `original_id`, newest first.
    fn duplicate_history_for(&self, parent_id: Uuid) -> BugtriageResult<Vec<DuplicateHistory>>;

    // --- Event logs ---
    fn record_duplicate_history(&self, history: &DuplicateHistory) -> BugtriageResult<()>;
    fn record_audit_log(&self, entry: &AuditLog) -> BugtriageResult<()>;

    // --- Low-quality queue ---
    fn enqueue_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()>;
    fn get_low_quality(&self, id: Uuid) -> BugtriageResult<Option<LowQualityQueue>>;
    fn update_low_quality(&self, entry: &LowQualityQueue) -> BugtriageResult<()>;
    fn pending_low_quality(&self) -> BugtriageResult<Vec<LowQualityQueue>>;

    // --- Embedding cache (L2 tier) ---
    fn get_cached_embedding(&self, content_hash: &str) -> BugtriageResult<Option<Vec<f32>>>;
    fn put_cached_embedding(&self, content_hash: &str, embedding: &[f32]) -> BugtriageResult<()>;

    // --- Maintenance ---
    fn vacuum(&self) -> BugtriageResult<()>;
}
