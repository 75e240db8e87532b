//! HTTP facade for the bug duplicate-detection pipeline.
//!
//! Thin transport layer: every handler deserializes its request,
//! delegates to `DuplicateDetector`/`IBugStorage`/`IVectorIndex`, and maps
//! the result onto the documented response/error envelope. No pipeline
//! logic lives here.

pub mod build;
pub mod context;
pub mod error;
pub mod rebuild;
pub mod routes;
pub mod state;

pub use build::build_state;
pub use state::AppState;
