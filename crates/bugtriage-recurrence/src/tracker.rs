//! Recurrence threshold check (spec §4.7): run after every Duplicate or
//! Blocked event to see whether the parent bug should be promoted.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use bugtriage_core::config::RecurrenceConfig;
use bugtriage_core::errors::BugtriageResult;
use bugtriage_core::models::audit_log::AuditEventType;
use bugtriage_core::models::bug::Classification;
use bugtriage_core::models::AuditLog;
use bugtriage_core::traits::IBugStorage;

/// Tracks duplicate recurrence on parent bugs and promotes them to
/// `Recurring` once their live-plus-blocked duplicate count crosses
/// `config.threshold`.
pub struct RecurrenceTracker {
    storage: Arc<dyn IBugStorage>,
    config: RecurrenceConfig,
}

impl RecurrenceTracker {
    pub fn new(storage: Arc<dyn IBugStorage>, config: RecurrenceConfig) -> Self {
        Self { storage, config }
    }

    /// Evaluate recurrence for `parent_id` after a duplicate event.
    /// `new_duplicate_id` is the bug row created by a `FlaggedDuplicate`
    /// outcome; it is `None` for a `BlockedDuplicate` outcome, since no
    /// row is created in that case.
    pub fn track(&self, parent_id: Uuid, new_duplicate_id: Option<Uuid>) -> BugtriageResult<()> {
        let live = self.storage.count_duplicates(parent_id)?;
        let blocked = self.storage.count_blocked_duplicate_history(parent_id)?;
        let count = live + blocked;

        if count < self.config.threshold {
            tracing::debug!(
                %parent_id,
                count,
                threshold = self.config.threshold,
                "recurrence threshold not reached"
            );
            return Ok(());
        }

        let Some(mut parent) = self.storage.get_bug(parent_id)? else {
            tracing::warn!(%parent_id, "recurrence check on missing parent bug");
            return Ok(());
        };

        let already_recurring = parent.is_recurring && parent.classification == Classification::Recurring;

        if !already_recurring {
            let previous_classification = format!("{:?}", parent.classification);
            parent.is_recurring = true;
            parent.classification = Classification::Recurring;
            parent.updated_at = Utc::now();
            self.storage.update_bug(&parent)?;

            self.storage.record_audit_log(&AuditLog {
                id: Uuid::new_v4(),
                event_type: AuditEventType::ClassificationChanged,
                bug_id: Some(parent_id),
                parent_id: None,
                actor: "system".to_string(),
                ai_confidence: None,
                reasoning: Some(serde_json::json!({
                    "reason": "recurrence_threshold_crossed",
                    "duplicate_count": count,
                    "threshold": self.config.threshold,
                })),
                previous_state: Some(previous_classification),
                new_state: Some("recurring".to_string()),
                created_at: Utc::now(),
            })?;

            tracing::info!(%parent_id, count, "bug promoted to recurring");
        }

        if let Some(dup_id) = new_duplicate_id {
            if let Some(mut dup) = self.storage.get_bug(dup_id)? {
                if dup.classification != Classification::Recurring {
                    dup.classification = Classification::Recurring;
                    dup.updated_at = Utc::now();
                    self.storage.update_bug(&dup)?;
                }
            }
        }

        Ok(())
    }
}
