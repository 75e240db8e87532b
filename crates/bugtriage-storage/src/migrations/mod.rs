//! Schema migrations, applied in order on every `StorageEngine::initialize`.
//! Each migration uses `CREATE TABLE IF NOT EXISTS` / `CREATE INDEX IF NOT
//! EXISTS` so re-running against an already-migrated database is a no-op.

mod v001_bug_tables;

use rusqlite::Connection;

use bugtriage_core::errors::{BugtriageResult, StorageError};

/// Run all migrations in order against `conn`.
pub fn run_migrations(conn: &Connection) -> BugtriageResult<()> {
    v001_bug_tables::migrate(conn).map_err(|e| {
        StorageError::MigrationFailed {
            version: 1,
            reason: e.to_string(),
        }
        .into()
    })?;
    Ok(())
}
