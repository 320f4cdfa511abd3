//! Debounced implicit submission.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use bcn_common::{Debouncer, Scheduler, Subscription};
use bcn_form::{FormEvent, FormStore, FormValues, WeakFormStore};

use super::config::AutoSaveConfig;
use super::tracker::DirtyTracker;

type SubmitFn = Box<dyn FnMut(&FormValues) -> anyhow::Result<()>>;

struct AutosaveShared {
    form: WeakFormStore,
    scheduler: Scheduler,
    threshold: Duration,
    debouncer: RefCell<Debouncer>,
    tracker: RefCell<DirtyTracker>,
    submit: RefCell<SubmitFn>,
    /// A timer fired while a submit was running.
    rerun: Cell<bool>,
}

impl AutosaveShared {
    fn on_form_event(this: &Rc<Self>, event: &FormEvent) {
        if !matches!(event, FormEvent::ValuesChanged { .. }) {
            return;
        }
        this.tracker.borrow_mut().mark_dirty(this.scheduler.now());
        Self::arm(this);
    }

    /// (Re)start the threshold timer.
    fn arm(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        this.debouncer.borrow_mut().trigger(this.threshold, move || {
            if let Some(shared) = weak.upgrade() {
                Self::fire(&shared);
            }
        });
    }

    fn fire(this: &Rc<Self>) {
        let Some(form) = this.form.upgrade() else {
            return;
        };
        let Ok(mut submit) = this.submit.try_borrow_mut() else {
            // The host advanced the scheduler from inside the submit routine.
            // That submit may predate the latest change, so go again after it.
            tracing::debug!("autosave fired while a submit is running, deferring");
            this.rerun.set(true);
            return;
        };

        let values = form.values();
        this.tracker.borrow_mut().start_submit();
        tracing::debug!(fields = values.len(), "autosave submitting");

        // No tracker or debouncer borrow is held here: the routine may edit
        // the form, which re-arms the debounce through `on_form_event`.
        let result = submit(&values);
        drop(submit);

        match result {
            Ok(()) => {
                this.tracker.borrow_mut().submit_complete();
                tracing::debug!("autosave submit complete");
            }
            Err(e) => {
                tracing::warn!(error = %e, "autosave submit failed, waiting for the next change");
                this.tracker.borrow_mut().submit_failed(format!("{e:#}"));
            }
        }

        if this.rerun.replace(false) {
            Self::arm(this);
        }
    }
}

/// Submits a form automatically after its values stop changing.
///
/// Every value change restarts the `threshold` timer (trailing edge), so
/// only the final state of a burst is submitted. A zero threshold submits
/// on the next scheduler pass. A failed submit is recorded and logged but
/// never retried on a timer; the next value change tries again. A change
/// whose timer comes due while a submit is still running is submitted once
/// that submit returns.
///
/// Dropping the handle (unmount) cancels a pending submit.
pub struct Autosave {
    shared: Rc<AutosaveShared>,
    _subscription: Subscription,
}

impl fmt::Debug for Autosave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autosave")
            .field("threshold", &self.shared.threshold)
            .field("pending", &self.is_pending())
            .field("tracker", &*self.shared.tracker.borrow())
            .finish()
    }
}

impl Autosave {
    /// Start autosaving `form` through `submit`.
    pub fn register<F>(form: &FormStore, scheduler: &Scheduler, threshold: Duration, submit: F) -> Self
    where
        F: FnMut(&FormValues) -> anyhow::Result<()> + 'static,
    {
        let shared = Rc::new(AutosaveShared {
            form: form.downgrade(),
            scheduler: scheduler.clone(),
            threshold,
            debouncer: RefCell::new(Debouncer::new(scheduler)),
            tracker: RefCell::new(DirtyTracker::new()),
            submit: RefCell::new(Box::new(submit)),
            rerun: Cell::new(false),
        });

        let weak = Rc::downgrade(&shared);
        let subscription = form.subscribe(move |event| {
            if let Some(shared) = weak.upgrade() {
                AutosaveShared::on_form_event(&shared, event);
            }
        });

        tracing::debug!(threshold_ms = threshold.as_millis() as u64, "autosave registered");
        Self {
            shared,
            _subscription: subscription,
        }
    }

    /// Register according to `config`; `None` when autosave is disabled.
    pub fn from_config<F>(
        config: &AutoSaveConfig,
        form: &FormStore,
        scheduler: &Scheduler,
        submit: F,
    ) -> Option<Self>
    where
        F: FnMut(&FormValues) -> anyhow::Result<()> + 'static,
    {
        config
            .enabled
            .then(|| Self::register(form, scheduler, config.threshold(), submit))
    }

    /// The debounce threshold.
    pub fn threshold(&self) -> Duration {
        self.shared.threshold
    }

    /// Whether a submit is scheduled.
    pub fn is_pending(&self) -> bool {
        self.shared.debouncer.borrow().is_pending()
    }

    /// Submit progress, for a "saving… / saved / failed" indicator.
    pub fn status(&self) -> Ref<'_, DirtyTracker> {
        self.shared.tracker.borrow()
    }

    /// Drop a scheduled submit without running it.
    pub fn cancel(&self) -> bool {
        self.shared.debouncer.borrow_mut().cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use serde_json::json;

    fn form() -> FormStore {
        let mut initial = FormValues::new();
        initial.insert("name".to_string(), json!(""));
        FormStore::new(initial)
    }

    #[test]
    fn test_trailing_edge_submits_last_value_once() {
        let scheduler = Scheduler::new();
        let form = form();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let autosave = Autosave::register(&form, &scheduler, Duration::from_millis(500), move |v| {
            sink.borrow_mut().push(v["name"].clone());
            Ok(())
        });

        for (i, text) in ["a", "ab", "abc"].iter().enumerate() {
            form.set_field_value("name", json!(text));
            scheduler.advance_by(Duration::from_millis(300));
            if i < 2 {
                assert!(seen.borrow().is_empty());
            }
        }
        scheduler.advance_by(Duration::from_millis(200));

        assert_eq!(*seen.borrow(), vec![json!("abc")]);
        assert!(!autosave.is_pending());
        assert_eq!(autosave.status().submit_count(), 1);
        assert!(!autosave.status().is_dirty());
    }

    #[test]
    fn test_zero_threshold_fires_on_next_pass() {
        let scheduler = Scheduler::new();
        let form = form();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let _autosave = Autosave::register(&form, &scheduler, Duration::ZERO, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        form.set_field_value("name", json!("x"));
        assert_eq!(calls.get(), 0);
        scheduler.run_pending();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_disabled_config_registers_nothing() {
        let scheduler = Scheduler::new();
        let form = form();
        let autosave = Autosave::from_config(&AutoSaveConfig::disabled(), &form, &scheduler, |_| Ok(()));
        assert!(autosave.is_none());
    }

    #[test]
    fn test_change_during_submit_is_submitted_afterwards() {
        let scheduler = Scheduler::new();
        let form = form();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let handle = form.clone();
        let host = scheduler.clone();
        let autosave = Autosave::register(&form, &scheduler, Duration::ZERO, move |v| {
            sink.borrow_mut().push(v["name"].clone());
            if v["name"] == json!("draft") {
                // The user types while the save is in flight and the host
                // pumps its timers before the save returns.
                handle.set_field_value("name", json!("final"));
                host.run_pending();
            }
            Ok(())
        });

        form.set_field_value("name", json!("draft"));
        scheduler.run_pending();

        assert_eq!(*seen.borrow(), vec![json!("draft"), json!("final")]);
        assert!(!autosave.is_pending());
        assert_eq!(autosave.status().submit_count(), 2);
        assert!(!autosave.status().is_dirty());
    }

    #[test]
    fn test_drop_cancels_pending_submit() {
        let scheduler = Scheduler::new();
        let form = form();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let autosave = Autosave::register(&form, &scheduler, Duration::from_millis(100), move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        form.set_field_value("name", json!("x"));
        drop(autosave);
        scheduler.advance_by(Duration::from_secs(1));
        assert_eq!(calls.get(), 0);
    }
}
