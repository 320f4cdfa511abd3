//! Overlay classes and the overlay trait.

use std::fmt;
use std::hash::Hash;

/// The two independent overlay slots of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayClass {
    /// Centered modal dialog.
    Modal,
    /// Slide-in side panel.
    Sidesheet,
}

impl OverlayClass {
    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Sidesheet => "sidesheet",
        }
    }
}

impl fmt::Display for OverlayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of overlays of one class.
///
/// Implementors are enums whose variants carry the typed props of each
/// overlay, paired with a fieldless `Kind` enum naming the variants. The
/// kind is what renderers are registered against.
pub trait Overlay: Clone + fmt::Debug + 'static {
    /// Fieldless discriminant of the overlay.
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static;

    /// Which store this overlay belongs to.
    const CLASS: OverlayClass;

    /// The discriminant of this overlay.
    fn kind(&self) -> Self::Kind;

    /// Every kind of this class, used to check registry totality.
    fn all_kinds() -> &'static [Self::Kind];
}
