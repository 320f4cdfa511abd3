//! The per-class overlay store.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bcn_common::{Listeners, Subscription};

use crate::descriptor::{OverlayDescriptor, OverlayPhase};
use crate::overlay::Overlay;

struct StoreShared<O: Overlay> {
    state: RefCell<OverlayDescriptor<O>>,
    listeners: Listeners<OverlayDescriptor<O>>,
}

/// Reactive state holding at most one overlay of class `O::CLASS`.
///
/// Created once at bootstrap and handed down explicitly; clones share the
/// same state. Mutations apply synchronously and listeners are notified in the
/// same turn, before the mutating call returns.
pub struct OverlayStore<O: Overlay> {
    shared: Rc<StoreShared<O>>,
}

impl<O: Overlay> Clone for OverlayStore<O> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<O: Overlay> Default for OverlayStore<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Overlay> fmt::Debug for OverlayStore<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayStore")
            .field("class", &O::CLASS)
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}

impl<O: Overlay> OverlayStore<O> {
    /// Create a closed store.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(StoreShared {
                state: RefCell::new(OverlayDescriptor::closed()),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Show `overlay`, replacing whatever is open or exiting.
    ///
    /// There is no queueing: the newest request wins and the previous overlay
    /// is dropped without waiting for its exit transition.
    pub fn show(&self, overlay: O) {
        let snapshot = {
            let mut state = self.shared.state.borrow_mut();
            let replaced = state.kind();
            state.generation += 1;
            tracing::debug!(
                class = %O::CLASS,
                kind = %overlay.kind(),
                generation = state.generation,
                replaced = ?replaced,
                "show overlay"
            );
            state.overlay = Some(overlay);
            state.visible = true;
            state.clone()
        };
        self.shared.listeners.emit(&snapshot);
    }

    /// Hide the current overlay.
    ///
    /// Kind and props are kept so the exit transition can still read them.
    /// Hiding an overlay that is already hidden (or closed) does nothing.
    pub fn hide(&self) {
        let snapshot = {
            let mut state = self.shared.state.borrow_mut();
            if state.phase() != OverlayPhase::Open {
                return;
            }
            state.visible = false;
            tracing::debug!(
                class = %O::CLASS,
                kind = ?state.kind(),
                generation = state.generation,
                "hide overlay"
            );
            state.clone()
        };
        self.shared.listeners.emit(&snapshot);
    }

    /// Signal that the overlay shown as `generation` finished its exit.
    ///
    /// Clears kind and props. Ignored (returns `false`) if the overlay is
    /// still visible or has since been replaced by a newer `show`.
    pub fn complete_exit(&self, generation: u64) -> bool {
        let snapshot = {
            let mut state = self.shared.state.borrow_mut();
            if state.generation != generation || state.phase() != OverlayPhase::Closing {
                tracing::trace!(
                    class = %O::CLASS,
                    generation,
                    current = state.generation,
                    "ignoring stale exit signal"
                );
                return false;
            }
            state.overlay = None;
            tracing::debug!(class = %O::CLASS, generation, "overlay closed");
            state.clone()
        };
        self.shared.listeners.emit(&snapshot);
        true
    }

    /// Force the store back to CLOSED. Used at teardown.
    pub fn reset(&self) {
        let snapshot = {
            let mut state = self.shared.state.borrow_mut();
            if state.phase() == OverlayPhase::Closed {
                return;
            }
            state.overlay = None;
            state.visible = false;
            state.clone()
        };
        self.shared.listeners.emit(&snapshot);
    }

    /// Copy of the current descriptor.
    pub fn snapshot(&self) -> OverlayDescriptor<O> {
        self.shared.state.borrow().clone()
    }

    /// Kind of the current (or exiting) overlay.
    pub fn kind(&self) -> Option<O::Kind> {
        self.shared.state.borrow().kind()
    }

    /// Whether an overlay is visible.
    pub fn is_visible(&self) -> bool {
        self.shared.state.borrow().visible
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> OverlayPhase {
        self.shared.state.borrow().phase()
    }

    /// Observe every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&OverlayDescriptor<O>) + 'static,
    {
        self.shared.listeners.subscribe(listener)
    }

    fn generation(&self) -> u64 {
        self.shared.state.borrow().generation
    }
}

/// Close semantics injected into a rendered overlay.
///
/// A context is bound to one showing of an overlay. Once a newer overlay has
/// replaced it, its `close` and `exit_complete` do nothing, so a late callback
/// from a torn-down overlay cannot close its successor.
pub struct OverlayContext<O: Overlay> {
    store: OverlayStore<O>,
    generation: u64,
    visible: bool,
}

impl<O: Overlay> Clone for OverlayContext<O> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            generation: self.generation,
            visible: self.visible,
        }
    }
}

impl<O: Overlay> fmt::Debug for OverlayContext<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayContext")
            .field("class", &O::CLASS)
            .field("generation", &self.generation)
            .field("visible", &self.visible)
            .finish()
    }
}

impl<O: Overlay> OverlayContext<O> {
    pub(crate) fn new(store: OverlayStore<O>, descriptor: &OverlayDescriptor<O>) -> Self {
        Self {
            store,
            generation: descriptor.generation,
            visible: descriptor.visible,
        }
    }

    /// Whether the overlay is visible in this render.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The showing this context belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hide this overlay (completion or cancellation).
    ///
    /// Returns `false` if this overlay is no longer the current one.
    pub fn close(&self) -> bool {
        if self.store.generation() != self.generation {
            return false;
        }
        self.store.hide();
        true
    }

    /// Report that the exit transition finished.
    pub fn exit_complete(&self) -> bool {
        self.store.complete_exit(self.generation)
    }
}
