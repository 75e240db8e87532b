//! Insert, get, update for `Bug` rows.

use rusqlite::{params, Connection, OptionalExtension};

use bugtriage_core::errors::{BugtriageResult, StorageError};
use bugtriage_core::models::bug::{Classification, Environment, Severity, Status, SubmissionContext};
use bugtriage_core::models::Bug;

use crate::to_storage_err;

/// Insert a new bug row. Wrapped in a transaction since a production bug
/// (`IBugStorage::create_bug`) must land atomically with its vector-index
/// entry at the call site, even though that entry lives in a separate
/// component — the storage side of that boundary is this one row write.
pub fn insert_bug(conn: &Connection, bug: &Bug) -> BugtriageResult<()> {
    let repro_steps_json =
        serde_json::to_string(&bug.repro_steps).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO bugs (
            id, title, description, product, component, version, severity,
            environment, device, os_version, build_version, region, reporter,
            repro_steps, expected_result, actual_result, logs, quality_score,
            embedding, is_duplicate, duplicate_of, similarity_score,
            is_recurring, classification, status, created_at, updated_at,
            submitter_id, api_key_id, ip, user_agent, is_automated, client_version
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28,
            ?29, ?30, ?31, ?32, ?33
        )",
        params![
            bug.id.to_string(),
            bug.title,
            bug.description,
            bug.product,
            bug.component,
            bug.version,
            bug.severity.map(serde_variant_str),
            bug.environment.map(serde_env_str),
            bug.device,
            bug.os_version,
            bug.build_version,
            bug.region,
            bug.reporter,
            repro_steps_json,
            bug.expected_result,
            bug.actual_result,
            bug.logs,
            bug.quality_score,
            bug.embedding.as_ref().map(|e| f32_vec_to_bytes(e)),
            bug.is_duplicate as i32,
            bug.duplicate_of.map(|id| id.to_string()),
            bug.similarity_score,
            bug.is_recurring as i32,
            classification_str(bug.classification),
            status_str(bug.status),
            bug.created_at.to_rfc3339(),
            bug.updated_at.to_rfc3339(),
            bug.context.submitter_id,
            bug.context.api_key_id,
            bug.context.ip,
            bug.context.user_agent,
            bug.context.is_automated as i32,
            bug.context.client_version,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// Update an existing bug row in place.
pub fn update_bug(conn: &Connection, bug: &Bug) -> BugtriageResult<()> {
    let repro_steps_json =
        serde_json::to_string(&bug.repro_steps).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = conn
        .execute(
            "UPDATE bugs SET
                title = ?2, description = ?3, product = ?4, component = ?5,
                version = ?6, severity = ?7, environment = ?8, device = ?9,
                os_version = ?10, build_version = ?11, region = ?12,
                reporter = ?13, repro_steps = ?14, expected_result = ?15,
                actual_result = ?16, logs = ?17, quality_score = ?18,
                embedding = ?19, is_duplicate = ?20, duplicate_of = ?21,
                similarity_score = ?22, is_recurring = ?23,
                classification = ?24, status = ?25, updated_at = ?26
             WHERE id = ?1",
            params![
                bug.id.to_string(),
                bug.title,
                bug.description,
                bug.product,
                bug.component,
                bug.version,
                bug.severity.map(serde_variant_str),
                bug.environment.map(serde_env_str),
                bug.device,
                bug.os_version,
                bug.build_version,
                bug.region,
                bug.reporter,
                repro_steps_json,
                bug.expected_result,
                bug.actual_result,
                bug.logs,
                bug.quality_score,
                bug.embedding.as_ref().map(|e| f32_vec_to_bytes(e)),
                bug.is_duplicate as i32,
                bug.duplicate_of.map(|id| id.to_string()),
                bug.similarity_score,
                bug.is_recurring as i32,
                classification_str(bug.classification),
                status_str(bug.status),
                bug.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(StorageError::BugNotFound {
            id: bug.id.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Fetch a single bug by id.
pub fn get_bug(conn: &Connection, id: &str) -> BugtriageResult<Option<Bug>> {
    let mut stmt = conn
        .prepare(SELECT_BUG_COLUMNS)
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![id], |row| Ok(row_to_bug(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

const SELECT_BUG_COLUMNS: &str = "SELECT
    id, title, description, product, component, version, severity,
    environment, device, os_version, build_version, region, reporter,
    repro_steps, expected_result, actual_result, logs, quality_score,
    embedding, is_duplicate, duplicate_of, similarity_score, is_recurring,
    classification, status, created_at, updated_at, submitter_id,
    api_key_id, ip, user_agent, is_automated, client_version
    FROM bugs WHERE id = ?1";

/// Shared column list for `bug_query`'s multi-row SELECTs.
pub(crate) const BUG_COLUMNS: &str = "id, title, description, product, component,
    version, severity, environment, device, os_version, build_version,
    region, reporter, repro_steps, expected_result, actual_result, logs,
    quality_score, embedding, is_duplicate, duplicate_of, similarity_score,
    is_recurring, classification, status, created_at, updated_at,
    submitter_id, api_key_id, ip, user_agent, is_automated, client_version";

pub(crate) fn row_to_bug(row: &rusqlite::Row<'_>) -> BugtriageResult<Bug> {
    let id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let severity: Option<String> = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let environment: Option<String> = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let repro_steps_json: String = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_blob: Option<Vec<u8>> =
        row.get(18).map_err(|e| to_storage_err(e.to_string()))?;
    let duplicate_of: Option<String> =
        row.get(20).map_err(|e| to_storage_err(e.to_string()))?;
    let classification_str: String =
        row.get(23).map_err(|e| to_storage_err(e.to_string()))?;
    let status_str: String = row.get(24).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(25).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at: String = row.get(26).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> BugtriageResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Bug {
        id: uuid::Uuid::parse_str(&id).map_err(|e| to_storage_err(e.to_string()))?,
        title: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        description: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        product: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        component: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        version: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        severity: severity.as_deref().map(parse_severity).transpose()?,
        environment: environment.as_deref().map(parse_environment).transpose()?,
        device: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        os_version: row.get(9).map_err(|e| to_storage_err(e.to_string()))?,
        build_version: row.get(10).map_err(|e| to_storage_err(e.to_string()))?,
        region: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
        reporter: row.get(12).map_err(|e| to_storage_err(e.to_string()))?,
        repro_steps: serde_json::from_str(&repro_steps_json)
            .map_err(|e| to_storage_err(format!("parse repro_steps: {e}")))?,
        expected_result: row.get(14).map_err(|e| to_storage_err(e.to_string()))?,
        actual_result: row.get(15).map_err(|e| to_storage_err(e.to_string()))?,
        logs: row.get(16).map_err(|e| to_storage_err(e.to_string()))?,
        quality_score: row.get(17).map_err(|e| to_storage_err(e.to_string()))?,
        embedding: embedding_blob.map(|b| bytes_to_f32_vec(&b)),
        is_duplicate: row
            .get::<_, i32>(19)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        duplicate_of: duplicate_of
            .map(|s| uuid::Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| to_storage_err(e.to_string()))?,
        similarity_score: row.get(21).map_err(|e| to_storage_err(e.to_string()))?,
        is_recurring: row
            .get::<_, i32>(22)
            .map_err(|e| to_storage_err(e.to_string()))?
            != 0,
        classification: parse_classification(&classification_str)?,
        status: parse_status(&status_str)?,
        created_at: parse_dt(&created_at)?,
        updated_at: parse_dt(&updated_at)?,
        context: SubmissionContext {
            submitter_id: row.get(27).map_err(|e| to_storage_err(e.to_string()))?,
            api_key_id: row.get(28).map_err(|e| to_storage_err(e.to_string()))?,
            ip: row.get(29).map_err(|e| to_storage_err(e.to_string()))?,
            user_agent: row.get(30).map_err(|e| to_storage_err(e.to_string()))?,
            is_automated: row
                .get::<_, i32>(31)
                .map_err(|e| to_storage_err(e.to_string()))?
                != 0,
            client_version: row.get(32).map_err(|e| to_storage_err(e.to_string()))?,
        },
    })
}

pub(crate) fn serde_variant_str(s: Severity) -> String {
    match s {
        Severity::Critical => "critical",
        Severity::Major => "major",
        Severity::Minor => "minor",
        Severity::Trivial => "trivial",
    }
    .to_string()
}

fn serde_env_str(e: Environment) -> String {
    match e {
        Environment::Production => "production",
        Environment::Staging => "staging",
        Environment::Development => "development",
        Environment::Qa => "qa",
    }
    .to_string()
}

fn classification_str(c: Classification) -> &'static str {
    match c {
        Classification::Duplicate => "duplicate",
        Classification::Recurring => "recurring",
        Classification::None => "none",
    }
}

pub(crate) fn status_str(s: Status) -> &'static str {
    match s {
        Status::New => "new",
        Status::PendingReview => "pending_review",
        Status::Approved => "approved",
        Status::Rejected => "rejected",
        Status::Duplicate => "duplicate",
        Status::Resolved => "resolved",
        Status::Closed => "closed",
        Status::PendingReindex => "pending_reindex",
    }
}

fn parse_severity(s: &str) -> BugtriageResult<Severity> {
    Ok(match s {
        "critical" => Severity::Critical,
        "major" => Severity::Major,
        "minor" => Severity::Minor,
        "trivial" => Severity::Trivial,
        other => return Err(to_storage_err(format!("unknown severity '{other}'"))),
    })
}

fn parse_environment(s: &str) -> BugtriageResult<Environment> {
    Ok(match s {
        "production" => Environment::Production,
        "staging" => Environment::Staging,
        "development" => Environment::Development,
        "qa" => Environment::Qa,
        other => return Err(to_storage_err(format!("unknown environment '{other}'"))),
    })
}

pub(crate) fn parse_classification(s: &str) -> BugtriageResult<Classification> {
    Ok(match s {
        "duplicate" => Classification::Duplicate,
        "recurring" => Classification::Recurring,
        "none" => Classification::None,
        other => return Err(to_storage_err(format!("unknown classification '{other}'"))),
    })
}

pub(crate) fn parse_status(s: &str) -> BugtriageResult<Status> {
    Ok(match s {
        "new" => Status::New,
        "pending_review" => Status::PendingReview,
        "approved" => Status::Approved,
        "rejected" => Status::Rejected,
        "duplicate" => Status::Duplicate,
        "resolved" => Status::Resolved,
        "closed" => Status::Closed,
        "pending_reindex" => Status::PendingReindex,
        other => return Err(to_storage_err(format!("unknown status '{other}'"))),
    })
}

pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub(crate) fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugtriage_core::models::bug::SubmissionContext;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_bug() -> Bug {
        Bug {
            id: Uuid::new_v4(),
            title: "Crash on login".to_string(),
            description: "App crashes with null pointer".to_string(),
            product: "mobile-app".to_string(),
            component: Some("auth".to_string()),
            version: Some("1.2.3".to_string()),
            severity: Some(Severity::Major),
            environment: Some(Environment::Production),
            device: None,
            os_version: None,
            build_version: Some("2024.1".to_string()),
            region: Some("US".to_string()),
            reporter: Some("alice".to_string()),
            repro_steps: vec!["open app".to_string(), "tap login".to_string()],
            expected_result: None,
            actual_result: None,
            logs: None,
            quality_score: 0.8,
            embedding: Some(vec![0.1, 0.2, 0.3]),
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
    fn insert_then_get_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let bug = sample_bug();
        insert_bug(&conn, &bug).unwrap();

        let fetched = get_bug(&conn, &bug.id.to_string()).unwrap().unwrap();
        assert_eq!(fetched.id, bug.id);
        assert_eq!(fetched.title, bug.title);
        assert_eq!(fetched.repro_steps, bug.repro_steps);
        assert_eq!(fetched.embedding, bug.embedding);
        assert_eq!(fetched.severity, bug.severity);
    }

    #[test]
    fn get_missing_returns_none() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();
        assert!(get_bug(&conn, &Uuid::new_v4().to_string()).unwrap().is_none());
    }

    #[test]
    fn update_missing_bug_errors() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();
        let bug = sample_bug();
        assert!(update_bug(&conn, &bug).is_err());
    }

    #[test]
    fn update_changes_status_and_duplicate_fields() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let mut bug = sample_bug();
        insert_bug(&conn, &bug).unwrap();

        bug.status = Status::Duplicate;
        bug.is_duplicate = true;
        bug.duplicate_of = Some(Uuid::new_v4());
        bug.similarity_score = Some(0.91);
        update_bug(&conn, &bug).unwrap();

        let fetched = get_bug(&conn, &bug.id.to_string()).unwrap().unwrap();
        assert_eq!(fetched.status, Status::Duplicate);
        assert_eq!(fetched.duplicate_of, bug.duplicate_of);
        assert_eq!(fetched.similarity_score, Some(0.91));
    }
}
