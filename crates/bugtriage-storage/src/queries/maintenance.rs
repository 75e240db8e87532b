//! VACUUM, WAL checkpoint, integrity check, storage health stats.

use rusqlite::Connection;

use bugtriage_core::errors::BugtriageResult;

use crate::to_storage_err;

/// Run incremental vacuum, reclaiming `pages` free pages.
pub fn incremental_vacuum(conn: &Connection, pages: u32) -> BugtriageResult<()> {
    conn.execute_batch(&format!("PRAGMA incremental_vacuum({pages})"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Run a full vacuum.
pub fn full_vacuum(conn: &Connection) -> BugtriageResult<()> {
    conn.execute_batch("VACUUM")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn wal_checkpoint(conn: &Connection) -> BugtriageResult<()> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Run `PRAGMA integrity_check`. Returns true if the database is OK.
pub fn integrity_check(conn: &Connection) -> BugtriageResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result == "ok")
}

/// Counts surfaced by `/health`: bug totals by status, pending review
/// queue depth, and SQLite page/freelist stats for fragmentation.
#[derive(Debug, Clone)]
pub struct StorageHealthReport {
    pub total_bugs: usize,
    pub pending_low_quality: usize,
    pub total_duplicate_history: usize,
    pub page_count: u64,
    pub page_size: u64,
    pub freelist_count: u64,
}

impl StorageHealthReport {
    pub fn estimated_db_size(&self) -> u64 {
        self.page_count * self.page_size
    }

    pub fn fragmentation_pct(&self) -> f64 {
        if self.page_count == 0 {
            return 0.0;
        }
        (self.freelist_count as f64 / self.page_count as f64) * 100.0
    }
}

pub fn storage_health(conn: &Connection) -> BugtriageResult<StorageHealthReport> {
    let total_bugs: i64 = conn
        .query_row("SELECT COUNT(*) FROM bugs", [], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let pending_low_quality: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM low_quality_queue WHERE status = 'pending'",
            [],
            |r| r.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let total_duplicate_history: i64 = conn
        .query_row("SELECT COUNT(*) FROM duplicate_history", [], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let page_count: u64 = conn
        .pragma_query_value(None, "page_count", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let page_size: u64 = conn
        .pragma_query_value(None, "page_size", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let freelist_count: u64 = conn
        .pragma_query_value(None, "freelist_count", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(StorageHealthReport {
        total_bugs: total_bugs as usize,
        pending_low_quality: pending_low_quality as usize,
        total_duplicate_history: total_duplicate_history as usize,
        page_count,
        page_size,
        freelist_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_check_passes_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();
        assert!(integrity_check(&conn).unwrap());
    }

    #[test]
    fn storage_health_reports_zero_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();
        let report = storage_health(&conn).unwrap();
        assert_eq!(report.total_bugs, 0);
        assert_eq!(report.pending_low_quality, 0);
        assert_eq!(report.fragmentation_pct(), 0.0);
    }
}
