//! Dirty state tracking for autosave.

use std::time::Instant;

/// Tracks changes not yet submitted.
///
/// Used to drive autosave and the "saving… / saved / failed" indicator.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Whether there are unsubmitted changes.
    dirty: bool,

    /// When the most recent change was made.
    last_change: Option<Instant>,

    /// Counts changes; lets a submit tell whether edits landed while it ran.
    change_seq: u64,

    /// `change_seq` captured when the running submit started.
    submitting: Option<u64>,

    /// Number of successful submits.
    submit_count: u64,

    /// Message of the most recent failed submit, cleared on success.
    last_error: Option<String>,
}

impl DirtyTracker {
    /// Create a tracker with no unsubmitted changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsubmitted changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if a submit is in progress.
    #[inline]
    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }

    /// When the most recent change was made.
    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    /// Number of successful submits.
    pub fn submit_count(&self) -> u64 {
        self.submit_count
    }

    /// Error of the most recent submit, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a change at `now`.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        self.last_change = Some(now);
        self.change_seq += 1;
    }

    /// Mark that a submit has started.
    pub fn start_submit(&mut self) {
        self.submitting = Some(self.change_seq);
    }

    /// Mark that a submit has completed successfully.
    ///
    /// Changes made while it ran keep the tracker dirty.
    pub fn submit_complete(&mut self) {
        let started_at = self.submitting.take();
        self.dirty = started_at != Some(self.change_seq);
        self.submit_count += 1;
        self.last_error = None;
    }

    /// Mark that a submit has failed.
    pub fn submit_failed(&mut self, error: impl Into<String>) {
        self.submitting = None;
        self.last_error = Some(error.into());
        // Keep dirty = true since submit failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = DirtyTracker::new();
        assert!(!tracker.is_dirty());
        assert!(!tracker.is_submitting());
        assert_eq!(tracker.last_change(), None);
    }

    #[test]
    fn test_submit_complete() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty(Instant::now());
        tracker.start_submit();
        assert!(tracker.is_submitting());

        tracker.submit_complete();
        assert!(!tracker.is_dirty());
        assert!(!tracker.is_submitting());
        assert_eq!(tracker.submit_count(), 1);
    }

    #[test]
    fn test_change_during_submit_stays_dirty() {
        let mut tracker = DirtyTracker::new();
        let now = Instant::now();
        tracker.mark_dirty(now);
        tracker.start_submit();
        tracker.mark_dirty(now);
        tracker.submit_complete();

        assert!(tracker.is_dirty());
    }

    #[test]
    fn test_submit_failed() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty(Instant::now());
        tracker.start_submit();
        tracker.submit_failed("network down");

        assert!(tracker.is_dirty()); // Still dirty
        assert!(!tracker.is_submitting());
        assert_eq!(tracker.last_error(), Some("network down"));
    }
}
