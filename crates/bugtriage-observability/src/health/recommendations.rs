//! Actionable recommendations based on system health.
//!
//! Examples: "42 submissions awaiting QA review", "index lagging storage".

use serde::{Deserialize, Serialize};

use super::reporter::HealthSnapshot;

/// Severity of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// An actionable recommendation surfaced through the health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
    pub action: String,
}

/// Generate recommendations from the current health snapshot.
pub fn generate(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if snapshot.pending_low_quality > 0 {
        let sev = if snapshot.pending_low_quality > 50 {
            Severity::Warning
        } else {
            Severity::Info
        };
        recs.push(Recommendation {
            severity: sev,
            message: format!(
                "{} submissions awaiting QA review in the low-quality queue",
                snapshot.pending_low_quality
            ),
            action: "review the low-quality queue".into(),
        });
    }

    if snapshot.fragmentation_pct > 30.0 {
        recs.push(Recommendation {
            severity: Severity::Warning,
            message: format!("database is {:.0}% fragmented", snapshot.fragmentation_pct),
            action: "run a vacuum".into(),
        });
    }

    if snapshot.total_bugs > 0 && snapshot.vector_index_size * 10 < snapshot.total_bugs * 9 {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: format!(
                "vector index holds {} of {} bugs",
                snapshot.vector_index_size, snapshot.total_bugs
            ),
            action: "trigger an index rebuild".into(),
        });
    }

    if !snapshot.storage_reachable {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: "storage pool is unreachable".into(),
            action: "check the database connection pool".into(),
        });
    }

    if !snapshot.index_reachable {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: "vector index is unreachable".into(),
            action: "check the index snapshot on disk".into(),
        });
    }

    recs
}
