//! One-off structured events that don't warrant their own span.

/// Logged whenever the degradation tracker records a new fallback.
pub fn degradation_triggered(component: &str, failure: &str, fallback_used: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component,
        failure,
        fallback_used,
        "subsystem degraded, falling back"
    );
}

/// Logged when a previously-degraded component recovers.
pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component,
        "subsystem recovered"
    );
}
