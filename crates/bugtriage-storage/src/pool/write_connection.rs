//! The single write connection. All mutating queries funnel through this
//! one `Connection`, serialized by a `Mutex` — SQLite only allows one
//! writer at a time, so pooling writers buys nothing and only adds
//! `SQLITE_BUSY` contention.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use bugtriage_core::errors::BugtriageResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> BugtriageResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> BugtriageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with the writer connection, holding the lock for
    /// the duration of the closure.
    pub fn with_conn_sync<F, T>(&self, f: F) -> BugtriageResult<T>
    where
        F: FnOnce(&Connection) -> BugtriageResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
