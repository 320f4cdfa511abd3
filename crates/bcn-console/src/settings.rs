//! Console settings - persisted user preferences.
//!
//! Settings are loaded from disk at startup. A missing or unreadable file
//! yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bcn_persistence::{
    AutoSaveConfig, DEFAULT_DRAFT_DEBOUNCE, DirectoryStorage, DraftStorage, FormDraftStore,
    MemoryStorage,
};

use crate::error::{ConsoleError, Result};
use crate::logging::LogFormat;

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Console settings.
///
/// Serialized to TOML and stored in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Form draft settings.
    pub drafts: DraftSettings,

    /// Autosave settings.
    pub autosave: AutoSaveConfig,

    /// Logging settings.
    pub logging: LoggingSettings,
}

impl ConsoleSettings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_error = |source| ConsoleError::SettingsWrite {
            path: path.to_path_buf(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_error)
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "Beacon", "BeaconConsole")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

// =============================================================================
// DRAFT SETTINGS
// =============================================================================

/// Where drafts are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In process memory; gone when the console exits.
    #[default]
    Memory,
    /// Files in a directory; see [`DraftSettings::directory`].
    Directory,
}

/// Form draft settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    /// Whether forms keep drafts at all.
    pub enabled: bool,

    /// Quiet period before a draft write, in milliseconds.
    pub debounce_ms: u64,

    /// Storage backend.
    pub storage: StorageKind,

    /// Directory for [`StorageKind::Directory`]. When unset, a per-session
    /// directory is created in the cache dir and removed on exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DRAFT_DEBOUNCE.as_millis() as u64,
            storage: StorageKind::default(),
            directory: None,
        }
    }
}

impl DraftSettings {
    /// Debounce as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Open the configured backend.
    pub fn open_storage(&self) -> Result<Box<dyn DraftStorage>> {
        let storage: Box<dyn DraftStorage> = match (self.storage, &self.directory) {
            (StorageKind::Memory, _) => Box::new(MemoryStorage::new()),
            (StorageKind::Directory, Some(dir)) => Box::new(DirectoryStorage::open(dir)?),
            (StorageKind::Directory, None) => {
                Box::new(DirectoryStorage::ephemeral(Self::session_parent())?)
            }
        };
        Ok(storage)
    }

    /// Build the draft store, falling back to memory if the backend fails.
    pub fn build_store(&self) -> FormDraftStore {
        if !self.enabled {
            return FormDraftStore::disabled();
        }
        match self.open_storage() {
            Ok(storage) => FormDraftStore::new(storage),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    suggestion = ?e.suggestion(),
                    "draft storage unavailable, keeping drafts in memory"
                );
                FormDraftStore::new(MemoryStorage::new())
            }
        }
    }

    fn session_parent() -> PathBuf {
        directories::ProjectDirs::from("io", "Beacon", "BeaconConsole")
            .map(|dirs| dirs.cache_dir().join("drafts"))
            .unwrap_or_else(|| std::env::temp_dir().join("bcn-drafts"))
    }
}

// =============================================================================
// LOGGING SETTINGS
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: error, warn, info, debug or trace.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether form values may appear in logs.
    pub log_values: bool,

    /// Optional log file. Logs go to stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_values: false,
            file: None,
        }
    }
}
