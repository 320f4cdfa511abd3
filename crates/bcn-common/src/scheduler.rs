//! Cooperative timer queue.
//!
//! The host event loop (an iced subscription tick, a frame callback, a test)
//! owns the passage of time and calls [`Scheduler::advance_to`]. Due timers run
//! in deadline order, ties in scheduling order. No borrow of the queue is held
//! while a callback runs, so callbacks may freely schedule or cancel timers.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

type TimerCallback = Box<dyn FnOnce()>;

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct SchedulerInner {
    /// Virtual "now". Only moves forward.
    now: Instant,
    next_id: u64,
    queue: BTreeMap<(Instant, TimerId), TimerCallback>,
    /// Reverse index used by cancellation.
    deadlines: HashMap<TimerId, Instant>,
}

/// Timer queue for the UI thread.
///
/// Cloning a `Scheduler` yields another handle to the same queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("pending", &inner.queue.len())
            .finish()
    }
}

impl Scheduler {
    /// Create a scheduler whose clock starts at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a scheduler whose clock starts at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now,
                next_id: 0,
                queue: BTreeMap::new(),
                deadlines: HashMap::new(),
            })),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.inner.borrow().now
    }

    /// Schedule `callback` to run once `delay` has elapsed.
    ///
    /// A zero delay runs on the next advance, never synchronously.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let deadline = inner.now + delay;
        inner.queue.insert((deadline, id), Box::new(callback));
        inner.deadlines.insert(id, deadline);
        tracing::trace!(timer = id.0, delay_ms = delay.as_millis() as u64, "timer scheduled");

        TimerHandle {
            id,
            deadline,
            scheduler: Rc::downgrade(&self.inner),
        }
    }

    /// Run every timer due at or before `target`, then move the clock there.
    ///
    /// Returns the number of callbacks that ran.
    pub fn advance_to(&self, target: Instant) -> usize {
        let mut fired = 0;
        loop {
            let callback = {
                let mut inner = self.inner.borrow_mut();
                let key = match inner.queue.first_key_value() {
                    Some((&(deadline, id), _)) if deadline <= target => (deadline, id),
                    _ => break,
                };
                inner.deadlines.remove(&key.1);
                if key.0 > inner.now {
                    inner.now = key.0;
                }
                inner.queue.remove(&key)
            };

            if let Some(callback) = callback {
                callback();
                fired += 1;
            }
        }

        let mut inner = self.inner.borrow_mut();
        if target > inner.now {
            inner.now = target;
        }
        fired
    }

    /// Advance the clock by `delta`.
    pub fn advance_by(&self, delta: Duration) -> usize {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    /// Run timers that are already due without moving the clock.
    pub fn run_pending(&self) -> usize {
        self.advance_by(Duration::ZERO)
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Deadline of the earliest pending timer.
    ///
    /// Hosts use this to decide when to wake up next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .borrow()
            .queue
            .first_key_value()
            .map(|(&(deadline, _), _)| deadline)
    }
}

/// Handle to a scheduled timer.
///
/// Dropping the handle cancels the timer. Store it alongside the component
/// that owns the pending work so teardown cancels it.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    id: TimerId,
    deadline: Instant,
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("deadline", &self.deadline)
            .field("active", &self.is_active())
            .finish()
    }
}

impl TimerHandle {
    /// Timer identifier.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// When the timer fires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Whether the timer is still waiting to fire.
    pub fn is_active(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| inner.borrow().deadlines.contains_key(&self.id))
    }

    /// Cancel the timer.
    ///
    /// Returns `true` if the timer was pending. Cancelling a timer that
    /// already fired (or whose scheduler is gone) is a no-op.
    pub fn cancel(&mut self) -> bool {
        let Some(inner) = self.scheduler.upgrade() else {
            return false;
        };
        let mut inner = inner.borrow_mut();
        match inner.deadlines.remove(&self.id) {
            Some(deadline) => {
                inner.queue.remove(&(deadline, self.id));
                tracing::trace!(timer = self.id.0, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
