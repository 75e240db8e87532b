//! CRUD for `low_quality_queue`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use bugtriage_core::errors::{BugtriageResult, StorageError};
use bugtriage_core::models::low_quality_queue::QueueStatus;
use bugtriage_core::models::{LowQualityQueue, Submission};

use crate::to_storage_err;

fn status_str(s: QueueStatus) -> &'static str {
    match s {
        QueueStatus::Pending => "pending",
        QueueStatus::Approved => "approved",
        QueueStatus::Rejected => "rejected",
    }
}

fn parse_status(s: &str) -> BugtriageResult<QueueStatus> {
    Ok(match s {
        "pending" => QueueStatus::Pending,
        "approved" => QueueStatus::Approved,
        "rejected" => QueueStatus::Rejected,
        other => return Err(to_storage_err(format!("unknown queue status '{other}'"))),
    })
}

pub fn enqueue_low_quality(conn: &Connection, entry: &LowQualityQueue) -> BugtriageResult<()> {
    let submission_json =
        serde_json::to_string(&entry.submission).map_err(|e| to_storage_err(e.to_string()))?;
    let issues_json: Vec<&String> = entry.quality_issues.iter().collect();
    let issues_json =
        serde_json::to_string(&issues_json).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO low_quality_queue (
            id, submission, quality_issues, status, reviewer, reviewed_at,
            created_bug_id, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id.to_string(),
            submission_json,
            issues_json,
            status_str(entry.status),
            entry.reviewer,
            entry.reviewed_at.map(|t| t.to_rfc3339()),
            entry.created_bug_id.map(|id| id.to_string()),
            entry.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

pub fn update_low_quality(conn: &Connection, entry: &LowQualityQueue) -> BugtriageResult<()> {
    let rows = conn
        .execute(
            "UPDATE low_quality_queue SET
                status = ?2, reviewer = ?3, reviewed_at = ?4, created_bug_id = ?5
             WHERE id = ?1",
            params![
                entry.id.to_string(),
                status_str(entry.status),
                entry.reviewer,
                entry.reviewed_at.map(|t| t.to_rfc3339()),
                entry.created_bug_id.map(|id| id.to_string()),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(StorageError::BugNotFound {
            id: entry.id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub fn get_low_quality(conn: &Connection, id: Uuid) -> BugtriageResult<Option<LowQualityQueue>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, submission, quality_issues, status, reviewer,
                    reviewed_at, created_bug_id, created_at
             FROM low_quality_queue WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![id.to_string()], |row| Ok(row_to_entry(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn pending_low_quality(conn: &Connection) -> BugtriageResult<Vec<LowQualityQueue>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, submission, quality_issues, status, reviewer,
                    reviewed_at, created_bug_id, created_at
             FROM low_quality_queue WHERE status = 'pending'
             ORDER BY created_at ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| Ok(row_to_entry(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> BugtriageResult<LowQualityQueue> {
    let id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let submission_json: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let issues_json: String = row.get(2).map_err(|e| to_storage_err(e.to_string()))?;
    let status: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let reviewed_at: Option<String> = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let created_bug_id: Option<String> = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;

    let submission: Submission =
        serde_json::from_str(&submission_json).map_err(|e| to_storage_err(e.to_string()))?;
    let issue_vec: Vec<String> =
        serde_json::from_str(&issues_json).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> BugtriageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(LowQualityQueue {
        id: Uuid::parse_str(&id).map_err(|e| to_storage_err(e.to_string()))?,
        submission,
        quality_issues: issue_vec.into_iter().collect::<HashSet<_>>(),
        status: parse_status(&status)?,
        reviewer: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        reviewed_at: reviewed_at.as_deref().map(parse_dt).transpose()?,
        created_bug_id: created_bug_id
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LowQualityQueue {
        LowQualityQueue {
            id: Uuid::new_v4(),
            submission: Submission {
                title: "x".into(),
                description: "short".into(),
                product: "p".into(),
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
            quality_issues: ["missing_title".to_string(), "description_too_short".to_string()]
                .into_iter()
                .collect(),
            status: QueueStatus::Pending,
            reviewer: None,
            reviewed_at: None,
            created_bug_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn enqueue_then_get_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let entry = sample_entry();
        enqueue_low_quality(&conn, &entry).unwrap();

        let fetched = get_low_quality(&conn, entry.id).unwrap().unwrap();
        assert_eq!(fetched.status, QueueStatus::Pending);
        assert_eq!(fetched.quality_issues, entry.quality_issues);
    }

    #[test]
    fn pending_only_returns_pending_entries() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let mut approved = sample_entry();
        approved.status = QueueStatus::Approved;
        let pending = sample_entry();

        enqueue_low_quality(&conn, &approved).unwrap();
        enqueue_low_quality(&conn, &pending).unwrap();

        let results = pending_low_quality(&conn).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, pending.id);
    }

    #[test]
    fn update_reviewer_and_status() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let mut entry = sample_entry();
        enqueue_low_quality(&conn, &entry).unwrap();

        entry.status = QueueStatus::Approved;
        entry.reviewer = Some("qa-bob".to_string());
        entry.reviewed_at = Some(Utc::now());
        entry.created_bug_id = Some(Uuid::new_v4());
        update_low_quality(&conn, &entry).unwrap();

        let fetched = get_low_quality(&conn, entry.id).unwrap().unwrap();
        assert_eq!(fetched.status, QueueStatus::Approved);
        assert_eq!(fetched.reviewer.as_deref(), Some("qa-bob"));
        assert_eq!(fetched.created_bug_id, entry.created_bug_id);
    }
}
