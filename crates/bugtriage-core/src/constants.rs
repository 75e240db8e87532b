/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding dimensionality (D).
pub const DEFAULT_VECTOR_DIMENSION: usize = 384;

/// Default hybrid-score threshold above which a submission is blocked
/// outright as a duplicate.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.85;

/// Default hybrid-score threshold above which a submission is created
/// but flagged as a duplicate.
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.70;

/// Weight of the vector-similarity term in the hybrid score.
pub const VECTOR_SCORE_WEIGHT: f64 = 0.7;

/// Weight of the metadata-overlap term in the hybrid score.
pub const METADATA_SCORE_WEIGHT: f64 = 0.3;

/// Fixed penalty subtracted from the hybrid score for cross-region matches.
pub const CROSS_REGION_PENALTY: f64 = 0.05;

/// Loose pre-filter multiplier applied to the threshold before ranking.
pub const CANDIDATE_PREFILTER_FACTOR: f64 = 0.8;

/// Default minimum description length (chars) for the quality gate.
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 50;

/// Default number of live/blocked duplicates on a parent before it is
/// marked recurring.
pub const DEFAULT_RECURRENCE_THRESHOLD: u32 = 3;

/// Default number of ranked candidates the similarity engine returns.
pub const DEFAULT_TOP_K: usize = 10;

/// Acceptable deviation from unit L2 norm for embedding vectors.
pub const UNIT_NORM_EPSILON: f32 = 1e-5;

/// Maximum depth walked when checking `duplicate_of` for cycles.
pub const MAX_DUPLICATE_CHAIN_DEPTH: usize = 64;

/// Default sub-deadline for embedding inference.
pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 200;

/// Default sub-deadline for vector-index search.
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 100;
