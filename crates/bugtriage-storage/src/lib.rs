//! # bugtriage-storage
//!
//! SQLite persistence for the bug duplicate-detection pipeline: schema
//! migrations, a single-writer/round-robin-reader connection pool, and the
//! `StorageEngine` that implements `bugtriage_core::traits::IBugStorage`.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use bugtriage_core::errors::{BugtriageError, StorageError};

/// Wrap a lower-level error string into the storage subsystem's error enum.
pub(crate) fn to_storage_err(message: impl Into<String>) -> BugtriageError {
    BugtriageError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
