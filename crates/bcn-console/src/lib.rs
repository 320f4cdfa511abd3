//! Beacon Console - client-side UI-state core.
//!
//! Composes the lower crates into what the console application uses:
//!
//! - [`Console`] - bootstrap context holding the modal and side-sheet stores,
//!   the draft store and the scheduler
//! - [`catalog`] - the console's modal and side-sheet kinds
//! - [`ManagedForm`] - a form with its draft session and autosave
//! - [`ConsoleSettings`] - TOML settings
//! - [`logging`] - tracing subscriber setup

pub mod catalog;
mod console;
mod error;
mod form;
pub mod logging;
mod settings;

pub use catalog::{EntityRef, ModalKind, ModalOverlay, SidesheetKind, SidesheetOverlay};
pub use console::Console;
pub use error::{ConsoleError, Result};
pub use form::{FormOptions, ManagedForm};
pub use settings::{ConsoleSettings, DraftSettings, LoggingSettings, StorageKind};
