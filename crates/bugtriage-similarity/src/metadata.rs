//! Metadata compatibility scoring between an incoming submission and a
//! candidate bug: a weighted sum over device/build_version/region/
//! os_version/severity, normalized by the weight actually contributed by
//! fields present on both sides.

use bugtriage_core::models::{Bug, Submission};

const WEIGHT_DEVICE: f64 = 0.20;
const WEIGHT_BUILD_VERSION: f64 = 0.30;
const WEIGHT_REGION: f64 = 0.20;
const WEIGHT_OS_VERSION: f64 = 0.15;
const WEIGHT_SEVERITY: f64 = 0.15;

/// Result of comparing one metadata field between submission and candidate.
struct FieldScore {
    name: &'static str,
    weight: f64,
    /// `None` when the field is absent on either side and doesn't
    /// contribute to the score at all.
    outcome: Option<f64>,
}

fn string_field(name: &'static str, weight: f64, a: &Option<String>, b: &Option<String>) -> FieldScore {
    let outcome = match (a.as_deref(), b.as_deref()) {
        (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Some(if a.eq_ignore_ascii_case(b) { 1.0 } else { 0.0 })
        }
        _ => None,
    };
    FieldScore { name, weight, outcome }
}

/// `major.minor` prefix of a dotted version string, e.g. `"2024.3.1"` →
/// `"2024.3"`. Returns `None` when fewer than two components are present.
fn major_minor(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    let major = parts.next()?;
    let minor = parts.next()?;
    Some(format!("{major}.{minor}"))
}

fn build_version_field(a: &Option<String>, b: &Option<String>) -> FieldScore {
    let outcome = match (a.as_deref(), b.as_deref()) {
        (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            if a.eq_ignore_ascii_case(b) {
                Some(1.0)
            } else {
                match (major_minor(a), major_minor(b)) {
                    (Some(pa), Some(pb)) if pa.eq_ignore_ascii_case(&pb) => Some(0.5),
                    _ => Some(0.0),
                }
            }
        }
        _ => None,
    };
    FieldScore {
        name: "build_version",
        weight: WEIGHT_BUILD_VERSION,
        outcome,
    }
}

fn severity_field(a: bugtriage_core::models::bug::Severity, b: bugtriage_core::models::bug::Severity, present: bool) -> FieldScore {
    let outcome = if present {
        Some(if a == b { 1.0 } else { 0.0 })
    } else {
        None
    };
    FieldScore {
        name: "severity",
        weight: WEIGHT_SEVERITY,
        outcome,
    }
}

/// Weighted metadata compatibility score in `[0, 1]`, plus the fields that
/// matched and the ones that differed (both sides present, unequal).
pub fn score(submission: &Submission, bug: &Bug) -> (f64, Vec<String>, Vec<String>) {
    let severity = match (submission.severity, bug.severity) {
        (Some(a), Some(b)) => severity_field(a, b, true),
        _ => severity_field(
            bugtriage_core::models::bug::Severity::Trivial,
            bugtriage_core::models::bug::Severity::Trivial,
            false,
        ),
    };

    let fields = [
        string_field("device", WEIGHT_DEVICE, &submission.device, &bug.device),
        build_version_field(&submission.build_version, &bug.build_version),
        string_field("region", WEIGHT_REGION, &submission.region, &bug.region),
        string_field("os_version", WEIGHT_OS_VERSION, &submission.os_version, &bug.os_version),
        severity,
    ];

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut matching_fields = Vec::new();
    let mut differing_fields = Vec::new();

    for field in fields {
        if let Some(outcome) = field.outcome {
            denominator += field.weight;
            numerator += field.weight * outcome;
            if outcome > 0.0 {
                matching_fields.push(field.name.to_string());
            } else {
                differing_fields.push(field.name.to_string());
            }
        }
    }

    let score = if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    };

    (score, matching_fields, differing_fields)
}
