//! # bugtriage-quality
//!
//! Pure quality-gate checker for incoming bug submissions: scores and
//! flags issues in a submission with no I/O, so the same report is
//! reproducible from the submission alone.

pub mod checker;

pub use checker::{categorize_issues, CategorizedIssues, QualityChecker};
