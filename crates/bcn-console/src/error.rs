//! Console composition errors.

use std::path::PathBuf;
use thiserror::Error;

use bcn_overlay::OverlayError;
use bcn_persistence::DraftError;

/// Errors raised while bootstrapping the console or saving its settings.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// An overlay catalog is not fully registered.
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// Draft storage could not be opened.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Settings file could not be written.
    #[error("Failed to write settings to {path}")]
    SettingsWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be serialized.
    #[error("Failed to serialize settings")]
    SettingsSerialize(#[from] toml::ser::Error),

    /// Log file could not be opened.
    #[error("Failed to open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global log subscriber is already installed.
    #[error("Failed to install log subscriber")]
    LoggingInit(#[from] tracing_subscriber::util::TryInitError),
}

impl ConsoleError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Overlay(_) => "The console is missing a dialog implementation.".to_string(),
            Self::Draft(e) => e.user_message(),
            Self::SettingsWrite { path, .. } => {
                format!("Could not save settings to {}.", path.display())
            }
            Self::SettingsSerialize(_) => "An error occurred while saving settings.".to_string(),
            Self::LogFile { path, .. } => {
                format!("Could not open log file {}.", path.display())
            }
            Self::LoggingInit(_) => "Logging is already configured.".to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Overlay(_) => Some("Register every overlay kind at startup.".into()),
            Self::Draft(e) => e.suggestion(),
            Self::SettingsWrite { .. } | Self::LogFile { .. } => {
                Some("Check that the directory exists and is writable.".into())
            }
            Self::SettingsSerialize(_) | Self::LoggingInit(_) => None,
        }
    }
}

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
