//! Per-tab key-value storage backends.
//!
//! The host environment decides where drafts live. The state core only needs
//! string get/set/remove with web-storage semantics: synchronous, shared by
//! every form in the tab, gone when the tab (session) ends.

mod directory;
mod disabled;
mod memory;

pub use directory::DirectoryStorage;
pub use disabled::DisabledStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// Synchronous string key-value storage scoped to one tab session.
///
/// Methods take `&self`; implementations use interior mutability, the way a
/// browser's session storage is a shared handle rather than an owned map.
pub trait DraftStorage {
    /// Read the entry for `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite the entry for `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the entry for `key`. Deleting a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: DraftStorage + ?Sized> DraftStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
