//! Overlay descriptor snapshots.

use crate::overlay::Overlay;

/// Lifecycle phase of an overlay class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    /// Nothing to render.
    Closed,
    /// Visible.
    Open,
    /// Hidden, but the last overlay is still rendered for its exit transition.
    Closing,
}

/// The state of one overlay class.
///
/// `overlay == None` is the terminal, closed state. A visible descriptor
/// always carries an overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor<O> {
    pub(crate) overlay: Option<O>,
    pub(crate) visible: bool,
    pub(crate) generation: u64,
}

impl<O: Overlay> OverlayDescriptor<O> {
    pub(crate) fn closed() -> Self {
        Self {
            overlay: None,
            visible: false,
            generation: 0,
        }
    }

    /// Kind of the current (or exiting) overlay.
    pub fn kind(&self) -> Option<O::Kind> {
        self.overlay.as_ref().map(O::kind)
    }

    /// Typed props of the current (or exiting) overlay.
    pub fn props(&self) -> Option<&O> {
        self.overlay.as_ref()
    }

    /// Whether the overlay is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Counter bumped on every `show`. Identifies one showing of an overlay.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> OverlayPhase {
        match (&self.overlay, self.visible) {
            (None, _) => OverlayPhase::Closed,
            (Some(_), true) => OverlayPhase::Open,
            (Some(_), false) => OverlayPhase::Closing,
        }
    }
}
