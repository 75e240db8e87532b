//! # bugtriage-index
//!
//! Exact inner-product vector index implementing
//! `bugtriage_core::traits::IVectorIndex`, with copy-on-write rebuild and
//! atomic on-disk persistence.

pub mod index;
pub mod persistence;
pub mod snapshot;

pub use index::VectorIndex;
pub use persistence::PersistencePaths;
pub use snapshot::Snapshot;
