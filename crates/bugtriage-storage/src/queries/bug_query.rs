//! Bulk fetch and filtered-query paths over `bugs`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::bug::{Classification, Status};
use bugtriage_core::models::Bug;
use bugtriage_core::traits::BugSearchFilter;

use super::bug_crud::{row_to_bug, serde_variant_str, status_str, BUG_COLUMNS};
use crate::to_storage_err;

fn collect_bugs(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> BugtriageResult<Vec<Bug>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_bug(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut bugs = Vec::new();
    for row in rows {
        bugs.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(bugs)
}

pub fn bulk_get(conn: &Connection, ids: &[Uuid]) -> BugtriageResult<Vec<Bug>> {
    let mut bugs = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(bug) = super::bug_crud::get_bug(conn, &id.to_string())? {
            bugs.push(bug);
        }
    }
    Ok(bugs)
}

/// All bugs eligible as similarity candidates: not retired, unless
/// recurring. Optionally narrowed to a single product.
pub fn search_candidates(conn: &Connection, product: Option<&str>) -> BugtriageResult<Vec<Bug>> {
    let sql = format!(
        "SELECT {BUG_COLUMNS} FROM bugs
         WHERE (status NOT IN ('resolved', 'closed') OR classification = 'recurring')
           AND (?1 IS NULL OR product = ?1)"
    );
    collect_bugs(conn, &sql, params![product])
}

pub fn bugs_by_status(conn: &Connection, status: Status) -> BugtriageResult<Vec<Bug>> {
    let sql = format!("SELECT {BUG_COLUMNS} FROM bugs WHERE status = ?1");
    collect_bugs(conn, &sql, params![status_str(status)])
}

pub fn bugs_created_between(
    conn: &Connection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> BugtriageResult<Vec<Bug>> {
    let sql = format!("SELECT {BUG_COLUMNS} FROM bugs WHERE created_at >= ?1 AND created_at <= ?2");
    collect_bugs(conn, &sql, params![from.to_rfc3339(), to.to_rfc3339()])
}

/// Filtered, paged bug search backing `GET /api/bugs/search`. Builds the
/// WHERE clause from whichever filter fields are set, runs a `COUNT(*)`
/// over the same predicate for the total, then pages the row fetch with
/// `LIMIT`/`OFFSET`.
pub fn search_bugs(
    conn: &Connection,
    filter: &BugSearchFilter,
) -> BugtriageResult<(Vec<Bug>, usize)> {
    let q_pattern = filter.q.as_ref().map(|q| format!("%{}%", q.to_lowercase()));
    let severity = filter.severity.map(serde_variant_str);
    let status = filter.status.map(status_str);

    let where_clause = "WHERE (?1 IS NULL OR lower(title) LIKE ?1 OR lower(description) LIKE ?1)
           AND (?2 IS NULL OR product = ?2)
           AND (?3 IS NULL OR status = ?3)
           AND (?4 IS NULL OR severity = ?4)";

    let count_sql = format!("SELECT COUNT(*) FROM bugs {where_clause}");
    let total: i64 = conn
        .query_row(
            &count_sql,
            params![q_pattern, filter.product, status, severity],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let page_sql = format!(
        "SELECT {BUG_COLUMNS} FROM bugs {where_clause}
         ORDER BY created_at DESC LIMIT ?5 OFFSET ?6"
    );
    let bugs = collect_bugs(
        conn,
        &page_sql,
        params![
            q_pattern,
            filter.product,
            status,
            severity,
            filter.limit as i64,
            filter.offset as i64
        ],
    )?;

    Ok((bugs, total as usize))
}

pub fn duplicates_of(conn: &Connection, parent_id: Uuid) -> BugtriageResult<Vec<Bug>> {
    let sql = format!("SELECT {BUG_COLUMNS} FROM bugs WHERE duplicate_of = ?1");
    collect_bugs(conn, &sql, params![parent_id.to_string()])
}

/// Count of live (non-retired) duplicates on `parent_id`.
pub fn count_duplicates(conn: &Connection, parent_id: Uuid) -> BugtriageResult<u32> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM bugs
             WHERE duplicate_of = ?1 AND status NOT IN ('resolved', 'closed')",
            params![parent_id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u32)
}

/// Count of `duplicate_history` rows with `was_blocked = 1` referencing
/// `parent_id` as `original_id`.
pub fn count_blocked_duplicate_history(conn: &Connection, parent_id: Uuid) -> BugtriageResult<u32> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM duplicate_history
             WHERE original_id = ?1 AND was_blocked = 1",
            params![parent_id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u32)
}

/// Whether redirecting `bug_id`'s `duplicate_of` to `new_parent_id` would
/// introduce a cycle. Walks the `duplicate_of` chain upward from
/// `new_parent_id`; if it reaches `bug_id`, the redirect would close a
/// loop. A `visited` set guards against an already-corrupt chain looping
/// forever.
pub fn has_cycle(conn: &Connection, bug_id: Uuid, new_parent_id: Uuid) -> BugtriageResult<bool> {
    if bug_id == new_parent_id {
        return Ok(true);
    }

    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut current = Some(new_parent_id);

    while let Some(id) = current {
        if id == bug_id {
            return Ok(true);
        }
        if !visited.insert(id) {
            // Already-corrupt chain; stop rather than loop forever.
            break;
        }
        current = conn
            .query_row(
                "SELECT duplicate_of FROM bugs WHERE id = ?1",
                params![id.to_string()],
                |row| row.get::<_, Option<String>>(0),
            )
            .map_err(|e| to_storage_err(e.to_string()))?
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| to_storage_err(e.to_string()))?;
    }

    Ok(false)
}
