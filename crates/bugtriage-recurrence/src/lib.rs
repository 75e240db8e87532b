//! # bugtriage-recurrence
//!
//! Recurrence tracking: after a duplicate (or blocked-duplicate) event,
//! checks whether a parent bug's duplicate count has crossed a threshold
//! and, if so, promotes it (and the triggering duplicate) to `Recurring`.

pub mod tracker;

pub use tracker::RecurrenceTracker;
