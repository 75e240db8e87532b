/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("bug not found: {id}")]
    BugNotFound { id: String },

    #[error("connection pool exhausted: {active_connections} active connections")]
    PoolExhausted { active_connections: usize },

    #[error("referential integrity violation: {details}")]
    IntegrityViolation { details: String },
}
