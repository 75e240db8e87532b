//! Span definitions per pipeline stage: quality, embed, search, decide, persist.
//!
//! Each span carries duration and stage-specific metadata via the
//! `tracing` crate. Used by `bugtriage-detector` to see where a
//! submission spends its time.

/// Create a quality-gate span.
#[macro_export]
macro_rules! quality_span {
    ($product:expr) => {
        tracing::info_span!("bugtriage.quality", product = %$product)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embed_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("bugtriage.embed", provider = %$provider, dimension = $dimension)
    };
}

/// Create a similarity-search span.
#[macro_export]
macro_rules! search_span {
    ($product:expr, $top_k:expr) => {
        tracing::info_span!("bugtriage.search", product = %$product, top_k = $top_k)
    };
}

/// Create a decision span (outcome tiering).
#[macro_export]
macro_rules! decide_span {
    ($hybrid_score:expr) => {
        tracing::info_span!("bugtriage.decide", hybrid_score = $hybrid_score)
    };
}

/// Create a persistence span.
#[macro_export]
macro_rules! persist_span {
    ($bug_id:expr) => {
        tracing::info_span!("bugtriage.persist", bug_id = %$bug_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const QUALITY: &str = "bugtriage.quality";
    pub const EMBED: &str = "bugtriage.embed";
    pub const SEARCH: &str = "bugtriage.search";
    pub const DECIDE: &str = "bugtriage.decide";
    pub const PERSIST: &str = "bugtriage.persist";
}
