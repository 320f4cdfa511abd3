//! Draft persistence error types.
//!
//! Every variant describes an environment limitation or unreadable data.
//! Callers of the non-`try_` helpers never see them; they are logged and the
//! operation degrades to a no-op.

use std::path::PathBuf;
use thiserror::Error;

/// Draft storage error.
#[derive(Debug, Error)]
pub enum DraftError {
    /// File I/O error in a directory-backed storage.
    #[error("Failed to {operation} draft storage at {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage quota would be exceeded by this write.
    #[error("Draft storage quota exceeded ({requested} bytes requested, {available} available)")]
    QuotaExceeded { requested: usize, available: usize },

    /// Storage is disabled or not provided by the host.
    #[error("Draft storage is unavailable")]
    Unavailable,

    /// A draft could not be serialized.
    #[error("Failed to serialize draft")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// A stored entry is not a readable draft.
    #[error("Stored draft under {key} is not readable")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete draft write")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DraftError {
    /// Whether the error comes from the storage environment rather than the data.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::QuotaExceeded { .. } | Self::Unavailable | Self::AtomicWriteFailed { .. }
        )
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { operation, .. } => {
                format!("Could not {operation} your unsaved changes.")
            }
            Self::QuotaExceeded { .. } => {
                "There is not enough browser storage left to keep your unsaved changes.".to_string()
            }
            Self::Unavailable => {
                "Unsaved changes cannot be kept because browser storage is disabled.".to_string()
            }
            Self::Serialization { .. } => {
                "An error occurred while keeping your unsaved changes.".to_string()
            }
            Self::Deserialization { .. } => {
                "Previously unsaved changes could not be restored.".to_string()
            }
            Self::AtomicWriteFailed { .. } => {
                "Could not finish keeping your unsaved changes.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Check that the draft directory exists and is writable.".into())
            }
            Self::QuotaExceeded { .. } => {
                Some("Close other forms with unsaved changes or clear site data.".into())
            }
            Self::Unavailable => Some("Enable site storage to keep drafts between visits.".into()),
            Self::Serialization { .. } | Self::Deserialization { .. } => None,
        }
    }
}

/// Result type alias for draft operations.
pub type Result<T> = std::result::Result<T, DraftError>;
