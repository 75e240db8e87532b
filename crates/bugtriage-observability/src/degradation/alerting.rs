//! Turns tracked degradations into alerts once they persist or recur
//! past a threshold, rather than firing on the first fallback.

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

/// How urgently an active degradation should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

/// A component whose degradation has crossed an alerting threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub component: String,
    pub level: AlertLevel,
    pub message: String,
}

const RECURRENCE_WINDOW_SECS: i64 = 300;
const WARNING_RECURRENCE_COUNT: usize = 3;
const CRITICAL_RECURRENCE_COUNT: usize = 10;
const WARNING_DURATION_SECS: i64 = 60;
const CRITICAL_DURATION_SECS: i64 = 900;

/// Evaluate every component with at least one recorded degradation event
/// and raise an alert when it has either recurred often or stayed active
/// too long.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let mut components: Vec<&str> = tracker
        .events()
        .iter()
        .map(|t| t.event.component.as_str())
        .collect();
    components.sort_unstable();
    components.dedup();

    components
        .into_iter()
        .filter_map(|component| evaluate_component(tracker, component))
        .collect()
}

fn evaluate_component(tracker: &DegradationTracker, component: &str) -> Option<DegradationAlert> {
    let recent = tracker.count_recent(component, RECURRENCE_WINDOW_SECS);
    let degraded_for = tracker.degraded_duration(component);

    let by_duration = degraded_for.and_then(|d| {
        if d.num_seconds() >= CRITICAL_DURATION_SECS {
            Some((
                AlertLevel::Critical,
                format!("{component} has been degraded for over {} minutes", d.num_minutes()),
            ))
        } else if d.num_seconds() >= WARNING_DURATION_SECS {
            Some((
                AlertLevel::Warning,
                format!("{component} has been degraded for {} minutes", d.num_minutes()),
            ))
        } else {
            None
        }
    });

    let by_recurrence = if recent >= CRITICAL_RECURRENCE_COUNT {
        Some((
            AlertLevel::Critical,
            format!("{component} has degraded {recent} times in the last 5 minutes"),
        ))
    } else if recent >= WARNING_RECURRENCE_COUNT {
        Some((
            AlertLevel::Warning,
            format!("{component} has degraded {recent} times in the last 5 minutes"),
        ))
    } else {
        None
    };

    let (level, message) = match (by_duration, by_recurrence) {
        (Some((dl, dm)), Some((rl, rm))) => {
            if rl as u8 >= dl as u8 {
                (rl, rm)
            } else {
                (dl, dm)
            }
        }
        (Some(d), None) => d,
        (None, Some(r)) => r,
        (None, None) => return None,
    };

    Some(DegradationAlert {
        component: component.to_string(),
        level,
        message,
    })
}
