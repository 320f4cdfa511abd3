//! Overlay registration errors.
//!
//! Both variants describe integration mistakes made while wiring renderers at
//! startup. None of them can be caused by a user at runtime.

use thiserror::Error;

use crate::overlay::OverlayClass;

/// Overlay registration error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// One or more kinds have no renderer.
    #[error("no renderer registered for {class} overlay kinds: {}", .kinds.join(", "))]
    MissingRegistration {
        class: OverlayClass,
        kinds: Vec<String>,
    },

    /// A kind was registered twice.
    #[error("{class} overlay kind {kind} is already registered")]
    DuplicateRegistration { class: OverlayClass, kind: String },
}

/// Result type alias for overlay registration.
pub type Result<T> = std::result::Result<T, OverlayError>;
