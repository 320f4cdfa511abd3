//! Mapping from overlay kind to implementation.

use std::collections::HashMap;
use std::fmt;

use crate::error::{OverlayError, Result};
use crate::overlay::Overlay;
use crate::store::OverlayContext;

/// Turns the active overlay into something drawable.
///
/// The preferred implementation is a type whose `render` matches exhaustively
/// on the overlay enum, so that adding a kind without a renderer fails to
/// compile. [`OverlayRegistry`] is the runtime alternative for feature modules
/// that register their overlays at startup.
pub trait OverlayRenderer<O: Overlay> {
    /// Rendered output, e.g. a widget tree.
    type Output;

    /// Render `overlay`. `ctx` carries the close semantics for this showing.
    ///
    /// Returns `None` only when no implementation exists for the kind.
    fn render(&self, overlay: &O, ctx: &OverlayContext<O>) -> Option<Self::Output>;
}

type ViewFn<O, Out> = Box<dyn Fn(&O, &OverlayContext<O>) -> Out>;

/// Runtime kind-to-view table, populated once at application start.
pub struct OverlayRegistry<O: Overlay, Out> {
    views: HashMap<O::Kind, ViewFn<O, Out>>,
}

impl<O: Overlay, Out> Default for OverlayRegistry<O, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Overlay, Out> fmt::Debug for OverlayRegistry<O, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayRegistry")
            .field("class", &O::CLASS)
            .field("registered", &self.views.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<O: Overlay, Out> OverlayRegistry<O, Out> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Register the view for `kind`.
    ///
    /// Each kind maps to exactly one implementation; a second registration
    /// is rejected.
    pub fn register<F>(&mut self, kind: O::Kind, view: F) -> Result<()>
    where
        F: Fn(&O, &OverlayContext<O>) -> Out + 'static,
    {
        if self.views.contains_key(&kind) {
            return Err(OverlayError::DuplicateRegistration {
                class: O::CLASS,
                kind: kind.to_string(),
            });
        }
        tracing::trace!(class = %O::CLASS, kind = %kind, "overlay registered");
        self.views.insert(kind, Box::new(view));
        Ok(())
    }

    /// Whether `kind` has a view.
    pub fn is_registered(&self, kind: O::Kind) -> bool {
        self.views.contains_key(&kind)
    }

    /// Kinds that still lack a view, in declaration order.
    pub fn missing(&self) -> Vec<O::Kind> {
        O::all_kinds()
            .iter()
            .copied()
            .filter(|kind| !self.views.contains_key(kind))
            .collect()
    }

    /// Check that every kind of the class is registered.
    pub fn verify(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(OverlayError::MissingRegistration {
                class: O::CLASS,
                kinds: missing.iter().map(ToString::to_string).collect(),
            })
        }
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<O: Overlay, Out> OverlayRenderer<O> for OverlayRegistry<O, Out> {
    type Output = Out;

    fn render(&self, overlay: &O, ctx: &OverlayContext<O>) -> Option<Out> {
        let kind = overlay.kind();
        match self.views.get(&kind) {
            Some(view) => Some(view(overlay, ctx)),
            None => {
                tracing::error!(class = %O::CLASS, kind = %kind, "no renderer registered for overlay");
                debug_assert!(
                    false,
                    "no renderer registered for {} overlay kind {}",
                    O::CLASS,
                    kind
                );
                None
            }
        }
    }
}
