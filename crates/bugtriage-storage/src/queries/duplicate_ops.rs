//! Append-only `duplicate_history` writes and lookups.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::DuplicateHistory;

use crate::to_storage_err;

const DUPLICATE_HISTORY_COLUMNS: &str = "id, original_id, candidate_id, similarity_score, \
    method, was_blocked, submission_snapshot, detected_at";

fn row_to_duplicate_history(row: &Row) -> rusqlite::Result<BugtriageResult<DuplicateHistory>> {
    let id: String = row.get(0)?;
    let original_id: String = row.get(1)?;
    let candidate_id: Option<String> = row.get(2)?;
    let similarity_score: f64 = row.get(3)?;
    let method: String = row.get(4)?;
    let was_blocked: i32 = row.get(5)?;
    let snapshot_json: String = row.get(6)?;
    let detected_at: String = row.get(7)?;

    Ok((|| {
        let submission_snapshot = serde_json::from_str(&snapshot_json)?;
        Ok(DuplicateHistory {
            id: id.parse().map_err(|e| to_storage_err(format!("bad id: {e}")))?,
            original_id: original_id
                .parse()
                .map_err(|e| to_storage_err(format!("bad original_id: {e}")))?,
            candidate_id: candidate_id
                .map(|c| c.parse::<Uuid>())
                .transpose()
                .map_err(|e| to_storage_err(format!("bad candidate_id: {e}")))?,
            similarity_score,
            method,
            was_blocked: was_blocked != 0,
            submission_snapshot,
            detected_at: DateTime::parse_from_rfc3339(&detected_at)
                .map_err(|e| to_storage_err(format!("bad detected_at: {e}")))?
                .with_timezone(&Utc),
        })
    })())
}

/// All history rows referencing `parent_id`, newest first.
pub fn duplicate_history_for(conn: &Connection, parent_id: Uuid) -> BugtriageResult<Vec<DuplicateHistory>> {
    let sql = format!(
        "SELECT {DUPLICATE_HISTORY_COLUMNS} FROM duplicate_history \
         WHERE original_id = ?1 ORDER BY detected_at DESC"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![parent_id.to_string()], row_to_duplicate_history)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut history = Vec::new();
    for row in rows {
        history.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(history)
}

pub fn record_duplicate_history(conn: &Connection, history: &DuplicateHistory) -> BugtriageResult<()> {
    let snapshot_json = serde_json::to_string(&history.submission_snapshot)
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO duplicate_history (
            id, original_id, candidate_id, similarity_score, method,
            was_blocked, submission_snapshot, detected_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            history.id.to_string(),
            history.original_id.to_string(),
            history.candidate_id.map(|id| id.to_string()),
            history.similarity_score,
            history.method,
            history.was_blocked as i32,
            snapshot_json,
            history.detected_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}
