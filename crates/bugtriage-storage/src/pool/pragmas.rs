//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 256MB mmap, 64MB cache, 5s busy_timeout,
//! foreign_keys ON, incremental auto_vacuum.

use rusqlite::Connection;

use bugtriage_core::errors::BugtriageResult;

use crate::to_storage_err;

/// Apply all performance and safety pragmas to the single writer connection.
pub fn apply_pragmas(conn: &Connection) -> BugtriageResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        PRAGMA auto_vacuum = INCREMENTAL;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Pragmas for a read-only pool connection: no WAL mode (the writer already
/// put the file in WAL), but the same timeout/cache tuning.
pub fn apply_read_pragmas(conn: &Connection) -> BugtriageResult<()> {
    conn.execute_batch(
        "
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> BugtriageResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
