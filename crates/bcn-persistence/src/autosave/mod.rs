//! Autosave for forms.
//!
//! Provides:
//! - `Autosave` - debounced implicit submission on value changes
//! - `DirtyTracker` - unsaved-change and submit-progress bookkeeping
//! - `AutoSaveConfig` - user settings for autosave behavior

mod config;
mod tracker;
mod trigger;

pub use config::AutoSaveConfig;
pub use tracker::DirtyTracker;
pub use trigger::Autosave;
