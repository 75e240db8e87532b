//! Append-only `audit_log` writes.

use rusqlite::{params, Connection};

use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::audit_log::AuditEventType;
use bugtriage_core::models::AuditLog;

use crate::to_storage_err;

fn event_type_str(t: AuditEventType) -> &'static str {
    match t {
        AuditEventType::BugCreated => "bug_created",
        AuditEventType::DuplicateDetected => "duplicate_detected",
        AuditEventType::DuplicateBlocked => "duplicate_blocked",
        AuditEventType::LowQualityFlagged => "low_quality_flagged",
        AuditEventType::QaOverride => "qa_override",
        AuditEventType::BugPromoted => "bug_promoted",
        AuditEventType::ClassificationChanged => "classification_changed",
    }
}

pub fn record_audit_log(conn: &Connection, entry: &AuditLog) -> BugtriageResult<()> {
    let reasoning_json = entry
        .reasoning
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO audit_log (
            id, event_type, bug_id, parent_id, actor, ai_confidence,
            reasoning, previous_state, new_state, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            entry.id.to_string(),
            event_type_str(entry.event_type),
            entry.bug_id.map(|id| id.to_string()),
            entry.parent_id.map(|id| id.to_string()),
            entry.actor,
            entry.ai_confidence,
            reasoning_json,
            entry.previous_state,
            entry.new_state,
            entry.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn record_audit_entry() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let entry = AuditLog {
            id: Uuid::new_v4(),
            event_type: AuditEventType::BugCreated,
            bug_id: Some(Uuid::new_v4()),
            parent_id: None,
            actor: "system".to_string(),
            ai_confidence: Some(0.95),
            reasoning: Some(serde_json::json!({"hybrid_score": 0.4})),
            previous_state: None,
            new_state: Some("new".to_string()),
            created_at: Utc::now(),
        };

        record_audit_log(&conn, &entry).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
