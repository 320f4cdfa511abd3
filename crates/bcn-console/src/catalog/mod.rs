//! The console's overlay catalog.
//!
//! One enum per overlay class. Each variant is one overlay implementation and
//! carries that overlay's props; the matching `*Kind` enum is the tag.

mod modal;
mod sidesheet;

pub use modal::{ModalKind, ModalOverlay};
pub use sidesheet::{SidesheetKind, SidesheetOverlay};

use serde::{Deserialize, Serialize};

/// Reference to a server-side entity, as passed to a confirmation overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Name to show the user, falling back to the id.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}
