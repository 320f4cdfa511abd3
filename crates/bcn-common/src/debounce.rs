//! Trailing-edge debounce on top of [`Scheduler`].

use std::time::Duration;

use crate::scheduler::{Scheduler, TimerHandle};

/// Coalesces bursts of triggers into one callback.
///
/// Every [`trigger`](Self::trigger) cancels the pending timer and arms a new
/// one, so only the last callback of a burst runs, `delay` after the last
/// trigger. Dropping the debouncer cancels whatever is pending.
#[derive(Debug)]
pub struct Debouncer {
    scheduler: Scheduler,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(scheduler: &Scheduler) -> Self {
        Self {
            scheduler: scheduler.clone(),
            pending: None,
        }
    }

    /// Restart the quiet period with a new callback.
    pub fn trigger<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + 'static,
    {
        // Replacing the handle drops (and cancels) the previous timer.
        self.pending = Some(self.scheduler.schedule(delay, callback));
    }

    /// Cancel the pending callback, if any.
    ///
    /// Returns `true` if something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|mut handle| handle.cancel())
    }

    /// Whether a callback is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(TimerHandle::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_burst_runs_only_last_callback() {
        let scheduler = Scheduler::new();
        let mut debouncer = Debouncer::new(&scheduler);
        let writes = Rc::new(RefCell::new(Vec::new()));

        for value in ["h", "he", "hel", "hell", "hello"] {
            let w = Rc::clone(&writes);
            debouncer.trigger(Duration::from_millis(250), move || w.borrow_mut().push(value));
            scheduler.advance_by(Duration::from_millis(100));
        }
        assert!(writes.borrow().is_empty());

        scheduler.advance_by(Duration::from_millis(250));
        assert_eq!(*writes.borrow(), vec!["hello"]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_trigger_resets_rather_than_extends() {
        let scheduler = Scheduler::new();
        let mut debouncer = Debouncer::new(&scheduler);
        let fired = Rc::new(RefCell::new(0));

        let f = Rc::clone(&fired);
        debouncer.trigger(Duration::from_millis(100), move || *f.borrow_mut() += 1);
        scheduler.advance_by(Duration::from_millis(90));

        let f = Rc::clone(&fired);
        debouncer.trigger(Duration::from_millis(100), move || *f.borrow_mut() += 1);

        // 100ms after the first trigger: reset, so nothing yet.
        scheduler.advance_by(Duration::from_millis(10));
        assert_eq!(*fired.borrow(), 0);

        scheduler.advance_by(Duration::from_millis(90));
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_cancel_and_drop() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(RefCell::new(false));

        let mut debouncer = Debouncer::new(&scheduler);
        let f = Rc::clone(&fired);
        debouncer.trigger(Duration::from_millis(10), move || *f.borrow_mut() = true);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let f = Rc::clone(&fired);
        debouncer.trigger(Duration::from_millis(10), move || *f.borrow_mut() = true);
        drop(debouncer);

        scheduler.advance_by(Duration::from_millis(50));
        assert!(!*fired.borrow());
    }
}
