//! v001: bugs, duplicate_history, low_quality_queue, audit_log, embedding_cache.

use rusqlite::Connection;

use bugtriage_core::errors::BugtriageResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> BugtriageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bugs (
            id                TEXT PRIMARY KEY,
            title             TEXT NOT NULL,
            description       TEXT NOT NULL,
            product           TEXT NOT NULL,
            component         TEXT,
            version           TEXT,
            severity          TEXT,
            environment       TEXT,
            device            TEXT,
            os_version        TEXT,
            build_version     TEXT,
            region            TEXT,
            reporter          TEXT,
            repro_steps       TEXT NOT NULL DEFAULT '[]',
            expected_result   TEXT,
            actual_result     TEXT,
            logs              TEXT,
            quality_score     REAL NOT NULL DEFAULT 0,
            embedding         BLOB,
            is_duplicate      INTEGER NOT NULL DEFAULT 0,
            duplicate_of      TEXT REFERENCES bugs(id),
            similarity_score  REAL,
            is_recurring      INTEGER NOT NULL DEFAULT 0,
            classification    TEXT NOT NULL DEFAULT 'none',
            status            TEXT NOT NULL DEFAULT 'new',
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL,
            submitter_id      TEXT,
            api_key_id        TEXT,
            ip                TEXT,
            user_agent        TEXT,
            is_automated      INTEGER NOT NULL DEFAULT 0,
            client_version    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_bugs_product ON bugs(product);
        CREATE INDEX IF NOT EXISTS idx_bugs_status ON bugs(status);
        CREATE INDEX IF NOT EXISTS idx_bugs_duplicate_of ON bugs(duplicate_of);
        CREATE INDEX IF NOT EXISTS idx_bugs_created_at ON bugs(created_at);
        CREATE INDEX IF NOT EXISTS idx_bugs_classification ON bugs(classification);

        CREATE TABLE IF NOT EXISTS duplicate_history (
            id                   TEXT PRIMARY KEY,
            original_id          TEXT NOT NULL,
            candidate_id         TEXT,
            similarity_score     REAL NOT NULL,
            method               TEXT NOT NULL,
            was_blocked          INTEGER NOT NULL,
            submission_snapshot  TEXT NOT NULL,
            detected_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_duphist_original ON duplicate_history(original_id);
        CREATE INDEX IF NOT EXISTS idx_duphist_candidate ON duplicate_history(candidate_id);

        CREATE TABLE IF NOT EXISTS low_quality_queue (
            id               TEXT PRIMARY KEY,
            submission       TEXT NOT NULL,
            quality_issues   TEXT NOT NULL,
            status           TEXT NOT NULL DEFAULT 'pending',
            reviewer         TEXT,
            reviewed_at      TEXT,
            created_bug_id   TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_lqq_status ON low_quality_queue(status);

        CREATE TABLE IF NOT EXISTS audit_log (
            id               TEXT PRIMARY KEY,
            event_type       TEXT NOT NULL,
            bug_id           TEXT,
            parent_id        TEXT,
            actor            TEXT NOT NULL,
            ai_confidence    REAL,
            reasoning        TEXT,
            previous_state   TEXT,
            new_state        TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_bug ON audit_log(bug_id);
        CREATE INDEX IF NOT EXISTS idx_audit_event_type ON audit_log(event_type);

        CREATE TABLE IF NOT EXISTS embedding_cache (
            content_hash   TEXT PRIMARY KEY,
            embedding      BLOB NOT NULL,
            dimensions     INTEGER NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
