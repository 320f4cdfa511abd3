//! Renders the active overlay of one class.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bcn_common::Subscription;

use crate::descriptor::{OverlayDescriptor, OverlayPhase};
use crate::overlay::Overlay;
use crate::registry::OverlayRenderer;
use crate::store::{OverlayContext, OverlayStore};

struct Frame<O> {
    descriptor: OverlayDescriptor<O>,
    needs_render: bool,
}

/// Subscribes to an [`OverlayStore`] and renders its active overlay.
///
/// The manager does not own animation timing. While the store is CLOSING it
/// keeps rendering the last overlay with `is_visible() == false`, until the
/// overlay reports [`OverlayContext::exit_complete`].
pub struct OverlayManager<O: Overlay, R: OverlayRenderer<O>> {
    store: OverlayStore<O>,
    renderer: R,
    frame: Rc<RefCell<Frame<O>>>,
    renders: Cell<u64>,
    _subscription: Subscription,
}

impl<O: Overlay, R: OverlayRenderer<O>> fmt::Debug for OverlayManager<O, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        f.debug_struct("OverlayManager")
            .field("class", &O::CLASS)
            .field("phase", &frame.descriptor.phase())
            .field("needs_render", &frame.needs_render)
            .field("renders", &self.renders.get())
            .finish()
    }
}

impl<O: Overlay, R: OverlayRenderer<O>> OverlayManager<O, R> {
    /// Attach a manager to `store`.
    pub fn new(store: &OverlayStore<O>, renderer: R) -> Self {
        let frame = Rc::new(RefCell::new(Frame {
            descriptor: store.snapshot(),
            needs_render: true,
        }));

        let sink = Rc::clone(&frame);
        let subscription = store.subscribe(move |descriptor| {
            let mut frame = sink.borrow_mut();
            frame.descriptor = descriptor.clone();
            frame.needs_render = true;
        });

        Self {
            store: store.clone(),
            renderer,
            frame,
            renders: Cell::new(0),
            _subscription: subscription,
        }
    }

    /// Render the current overlay, or `None` when CLOSED.
    pub fn render(&self) -> Option<R::Output> {
        let descriptor = {
            let mut frame = self.frame.borrow_mut();
            frame.needs_render = false;
            frame.descriptor.clone()
        };

        let overlay = descriptor.props()?;
        let ctx = OverlayContext::new(self.store.clone(), &descriptor);
        self.renders.set(self.renders.get() + 1);
        tracing::trace!(
            class = %O::CLASS,
            kind = %overlay.kind(),
            visible = descriptor.is_visible(),
            "render overlay"
        );
        self.renderer.render(overlay, &ctx)
    }

    /// Whether the store changed since the last render.
    pub fn needs_render(&self) -> bool {
        self.frame.borrow().needs_render
    }

    /// Lifecycle phase as last observed from the store.
    pub fn phase(&self) -> OverlayPhase {
        self.frame.borrow().descriptor.phase()
    }

    /// Descriptor as last observed from the store.
    pub fn descriptor(&self) -> OverlayDescriptor<O> {
        self.frame.borrow().descriptor.clone()
    }

    /// Number of renders that produced an overlay.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
