//! # bugtriage-core
//!
//! Foundation crate for the bug duplicate-detection pipeline.
//! Defines the bug data model, configuration, errors, and the trait
//! seams (`IEmbeddingProvider`, `IVectorIndex`, `IBugStorage`) that every
//! other crate in the workspace builds against.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::BugtriageConfig;
pub use errors::{BugtriageError, BugtriageResult};
pub use models::bug::{Bug, Classification, Environment, Severity, Status};
