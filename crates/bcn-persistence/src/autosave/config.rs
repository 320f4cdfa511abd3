//! Autosave configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for autosave behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether autosave is enabled.
    pub enabled: bool,

    /// Debounce delay in milliseconds.
    ///
    /// After a change, the form waits this long before submitting.
    /// Additional changes reset the timer. Zero submits on the next tick.
    pub debounce_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 2000, // 2 seconds
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled autosave config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Enabled config with the given threshold.
    pub fn with_debounce_ms(debounce_ms: u64) -> Self {
        Self {
            enabled: true,
            debounce_ms,
        }
    }

    /// Debounce threshold as a duration.
    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
