//! The stored draft envelope.

use std::sync::atomic::{AtomicBool, Ordering};

use bcn_form::FormValues;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};

/// Prefix of every draft key in the shared tab storage.
pub const DRAFT_KEY_PREFIX: &str = "bcn.formDraft.";

/// Storage key for a session id.
pub fn draft_key(session_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{session_id}")
}

/// A form's in-progress values, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    /// Caller-chosen id, unique per logical form instance.
    pub session_id: String,

    /// Full value set at the time of the write.
    pub values: FormValues,

    /// When the draft was written. Absent in drafts from older builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl FormDraft {
    /// Create a draft stamped with the current time.
    pub fn new(session_id: impl Into<String>, values: FormValues) -> Self {
        Self {
            session_id: session_id.into(),
            values,
            saved_at: Some(Utc::now()),
        }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| DraftError::Serialization { source })
    }

    /// Parse a stored entry.
    pub fn from_json(key: &str, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| DraftError::Deserialization {
            key: key.to_string(),
            source,
        })
    }
}

static LOG_VALUES_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder logged instead of draft values.
const REDACTED: &str = "[REDACTED]";

/// Allow draft values to appear in logs.
///
/// Drafts hold whatever the user typed, so this is off by default.
pub fn set_log_values(enabled: bool) {
    LOG_VALUES_ENABLED.store(enabled, Ordering::Release);
}

/// Returns true if draft values may be logged.
pub fn log_values_enabled() -> bool {
    LOG_VALUES_ENABLED.load(Ordering::Relaxed)
}

/// Render values for a log line, honoring [`set_log_values`].
pub fn redact_values(values: &FormValues) -> String {
    if log_values_enabled() {
        serde_json::to_string(values).unwrap_or_else(|_| REDACTED.to_string())
    } else {
        REDACTED.to_string()
    }
}
