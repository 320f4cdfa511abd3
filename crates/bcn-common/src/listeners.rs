//! Synchronous observer lists.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct ListenerSet<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
    /// Events emitted by a listener while an emit was running.
    pending: VecDeque<E>,
}

/// Clears the emitting flag even if a listener panics.
struct EmitGuard<'a>(&'a Cell<bool>);

impl Drop for EmitGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A list of callbacks notified synchronously, in subscription order.
///
/// `emit` works on a snapshot of the list, so a listener may subscribe,
/// unsubscribe, or re-enter whatever store owns the list. A listener removed
/// during an emit still sees that emit, but no later one.
///
/// An event emitted from inside a listener is queued and delivered once the
/// current event has reached every listener. All listeners therefore see
/// events in mutation order, and the last event each one sees is the latest.
pub struct Listeners<E> {
    inner: Rc<RefCell<ListenerSet<E>>>,
    emitting: Rc<Cell<bool>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            emitting: Rc::clone(&self.emitting),
        }
    }
}

impl<E: Clone + 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.inner.borrow().entries.len())
            .finish()
    }
}

impl<E: Clone + 'static> Listeners<E> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerSet {
                next_id: 0,
                entries: Vec::new(),
                pending: VecDeque::new(),
            })),
            emitting: Rc::new(Cell::new(false)),
        }
    }

    /// Register a listener. It stays registered until the guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = {
            let mut set = self.inner.borrow_mut();
            let id = set.next_id;
            set.next_id += 1;
            set.entries.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<ListenerSet<E>>> = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(set) = weak.upgrade() {
                    set.borrow_mut().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Notify every listener.
    ///
    /// Called re-entrantly from a listener, the event is queued behind the
    /// one being delivered and this returns immediately.
    pub fn emit(&self, event: &E) {
        if self.emitting.get() {
            self.inner.borrow_mut().pending.push_back(event.clone());
            return;
        }
        self.emitting.set(true);
        let _guard = EmitGuard(&self.emitting);

        self.deliver(event);
        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            match next {
                Some(event) => self.deliver(&event),
                None => break,
            }
        }
    }

    fn deliver(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard returned by [`Listeners::subscribe`]. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Subscription {
    /// Unsubscribe now rather than at drop.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_in_subscription_order() {
        let listeners = Listeners::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        let _a = listeners.subscribe(move |v| l.borrow_mut().push(("a", *v)));
        let l = Rc::clone(&log);
        let _b = listeners.subscribe(move |v| l.borrow_mut().push(("b", *v)));

        listeners.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let listeners = Listeners::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = listeners.subscribe(move |_| h.set(h.get() + 1));

        listeners.emit(&());
        drop(sub);
        listeners.emit(&());

        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_nested_emit_is_delivered_in_order() {
        let listeners = Listeners::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let handle = listeners.clone();
        let l = Rc::clone(&log);
        let _first = listeners.subscribe(move |v| {
            l.borrow_mut().push(("first", *v));
            if *v == 1 {
                handle.emit(&2);
            }
        });
        let l = Rc::clone(&log);
        let _second = listeners.subscribe(move |v| l.borrow_mut().push(("second", *v)));

        listeners.emit(&1);
        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );

        // Delivery state is reset afterwards.
        listeners.emit(&3);
        assert_eq!(log.borrow().last(), Some(&("second", 3)));
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let listeners = Listeners::<()>::new();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let handle = listeners.clone();
        let l = Rc::clone(&late);
        let _sub = listeners.subscribe(move |_| {
            l.borrow_mut().push(handle.subscribe(|_| {}));
        });

        listeners.emit(&());
        assert_eq!(listeners.len(), 2);
    }
}
