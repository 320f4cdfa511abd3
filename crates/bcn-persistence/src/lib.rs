//! Form drafts and autosave for the Beacon Console state core.
//!
//! # Features
//!
//! - **Draft restore** before the form becomes interactive
//! - **Debounced draft writes** while the form is dirty
//! - **Synchronous discard** that wins over any in-flight write
//! - **Autosave** with a trailing-edge debounce and no retry on failure
//!
//! Drafts are a convenience. Every storage failure is logged and swallowed by
//! the public helpers, and a form keeps working with drafts fully disabled.
//!
//! # Draft Format
//!
//! Each draft is one entry in a per-tab key-value storage:
//!
//! ```text
//! key:   "bcn.formDraft.<sessionId>"
//! value: {"sessionId":"<sessionId>","values":{...},"savedAt":"<RFC 3339>"}
//! ```
//!
//! There is no schema version. Restoring into a form whose shape changed keeps
//! the fields that still match by name and drops the rest.
//!
//! # Architecture
//!
//! - `storage/` - the [`DraftStorage`] trait and its backends
//! - `draft.rs` - the [`FormDraft`] envelope and key scheme
//! - `store.rs` - [`FormDraftStore`], the keyed draft API
//! - `session.rs` - [`DraftSession`], one form's restore/write/clear lifecycle
//! - `autosave/` - [`Autosave`], [`AutoSaveConfig`] and [`DirtyTracker`]
//! - `error.rs` - error types with user-friendly messages

mod autosave;
mod draft;
mod error;
mod session;
mod storage;
mod store;

pub use autosave::{AutoSaveConfig, Autosave, DirtyTracker};
pub use draft::{
    DRAFT_KEY_PREFIX, FormDraft, draft_key, log_values_enabled, redact_values, set_log_values,
};
pub use error::{DraftError, Result};
pub use session::{DEFAULT_DRAFT_DEBOUNCE, DraftSession};
pub use storage::{DirectoryStorage, DisabledStorage, DraftStorage, MemoryStorage};
pub use store::FormDraftStore;
