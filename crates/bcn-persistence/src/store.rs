//! Keyed draft persistence.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use bcn_form::FormValues;

use crate::draft::{FormDraft, draft_key, redact_values};
use crate::error::Result;
use crate::storage::{DisabledStorage, DraftStorage};

struct DraftStoreShared {
    storage: Box<dyn DraftStorage>,
    enabled: Cell<bool>,
    /// Bumped by every clear of an attached id. A write scheduled under an
    /// older epoch is stale. Entries go away when the id is released.
    epochs: RefCell<HashMap<String, u64>>,
    /// Session ids with an attached [`DraftSession`](crate::DraftSession).
    active: RefCell<HashSet<String>>,
}

/// Draft API over one tab's storage.
///
/// Created once at bootstrap; clones share the storage. The `persist`/`read`/
/// `clear` helpers never fail: storage errors are logged at `warn` and the
/// call degrades to a no-op. The `try_` variants return them.
#[derive(Clone)]
pub struct FormDraftStore {
    shared: Rc<DraftStoreShared>,
}

impl fmt::Debug for FormDraftStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDraftStore")
            .field("enabled", &self.shared.enabled.get())
            .field("active_sessions", &self.shared.active.borrow().len())
            .finish_non_exhaustive()
    }
}

impl FormDraftStore {
    /// Store drafts in `storage`.
    pub fn new(storage: impl DraftStorage + 'static) -> Self {
        Self {
            shared: Rc::new(DraftStoreShared {
                storage: Box::new(storage),
                enabled: Cell::new(true),
                epochs: RefCell::new(HashMap::new()),
                active: RefCell::new(HashSet::new()),
            }),
        }
    }

    /// A store with drafts turned off.
    pub fn disabled() -> Self {
        let store = Self::new(DisabledStorage);
        store.set_enabled(false);
        store
    }

    /// Turn drafts on or off. When off, reads find nothing and writes are skipped.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.set(enabled);
    }

    /// Whether drafts are on.
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.get()
    }

    // =========================================================================
    // FALLIBLE API
    // =========================================================================

    /// Write the full value set for `session_id`.
    pub fn try_persist_draft(&self, session_id: &str, values: &FormValues) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let draft = FormDraft::new(session_id, values.clone());
        self.shared
            .storage
            .set(&draft_key(session_id), &draft.to_json()?)?;
        tracing::debug!(
            session_id,
            fields = values.len(),
            values = %redact_values(values),
            "draft written"
        );
        Ok(())
    }

    /// Read the stored value set for `session_id`.
    pub fn try_read_draft(&self, session_id: &str) -> Result<Option<FormValues>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let key = draft_key(session_id);
        let Some(content) = self.shared.storage.get(&key)? else {
            return Ok(None);
        };
        let draft = FormDraft::from_json(&key, &content)?;
        if draft.session_id != session_id {
            tracing::warn!(
                session_id,
                stored = %draft.session_id,
                "draft envelope names a different session"
            );
        }
        Ok(Some(draft.values))
    }

    /// Delete the stored draft for `session_id`.
    ///
    /// Takes effect synchronously, and any debounced write scheduled before
    /// this call is dropped when it fires.
    pub fn try_clear_draft(&self, session_id: &str) -> Result<()> {
        // Only attached sessions can have a write in flight.
        if self.shared.active.borrow().contains(session_id) {
            *self
                .shared
                .epochs
                .borrow_mut()
                .entry(session_id.to_string())
                .or_insert(0) += 1;
        }
        if !self.is_enabled() {
            return Ok(());
        }
        self.shared.storage.remove(&draft_key(session_id))?;
        tracing::debug!(session_id, "draft cleared");
        Ok(())
    }

    // =========================================================================
    // INFALLIBLE API
    // =========================================================================

    /// Write the full value set for `session_id`; failures are logged.
    pub fn persist_draft(&self, session_id: &str, values: &FormValues) {
        if let Err(e) = self.try_persist_draft(session_id, values) {
            tracing::warn!(session_id, error = %e, "failed to write draft");
        }
    }

    /// Read the stored value set; unreadable or missing drafts yield `None`.
    pub fn read_draft(&self, session_id: &str) -> Option<FormValues> {
        self.try_read_draft(session_id).unwrap_or_else(|e| {
            tracing::warn!(session_id, error = %e, "failed to read draft");
            None
        })
    }

    /// Delete the stored draft; failures are logged.
    pub fn clear_draft(&self, session_id: &str) {
        if let Err(e) = self.try_clear_draft(session_id) {
            tracing::warn!(session_id, error = %e, "failed to clear draft");
        }
    }

    // =========================================================================
    // SESSION BOOKKEEPING
    // =========================================================================

    /// Current clear epoch of `session_id`.
    pub fn epoch(&self, session_id: &str) -> u64 {
        self.shared
            .epochs
            .borrow()
            .get(session_id)
            .copied()
            .unwrap_or(0)
    }

    /// Write only if no clear happened since `epoch` was read.
    ///
    /// Returns whether the write was attempted.
    pub fn persist_if_current(&self, session_id: &str, epoch: u64, values: &FormValues) -> bool {
        if self.epoch(session_id) != epoch {
            tracing::debug!(session_id, "dropping draft write scheduled before a discard");
            return false;
        }
        self.persist_draft(session_id, values);
        true
    }

    /// Mark `session_id` as attached. Returns `false` if it already was.
    pub(crate) fn acquire(&self, session_id: &str) -> bool {
        self.shared.active.borrow_mut().insert(session_id.to_string())
    }

    pub(crate) fn release(&self, session_id: &str) {
        self.shared.active.borrow_mut().remove(session_id);
        self.shared.epochs.borrow_mut().remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftError;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn values(text: &str) -> FormValues {
        FormValues::from([("text".to_string(), json!(text))])
    }

    #[test]
    fn test_persist_read_clear() {
        let store = FormDraftStore::new(MemoryStorage::new());
        assert_eq!(store.read_draft("s1"), None);

        store.persist_draft("s1", &values("x"));
        assert_eq!(store.read_draft("s1"), Some(values("x")));

        store.clear_draft("s1");
        assert_eq!(store.read_draft("s1"), None);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = FormDraftStore::new(MemoryStorage::new());
        store.persist_draft("a", &values("1"));
        store.persist_draft("b", &values("2"));
        store.clear_draft("a");
        assert_eq!(store.read_draft("b"), Some(values("2")));
    }

    #[test]
    fn test_disabled_storage_degrades_silently() {
        let store = FormDraftStore::new(DisabledStorage);
        store.persist_draft("s1", &values("x"));
        assert_eq!(store.read_draft("s1"), None);
        store.clear_draft("s1");

        assert!(matches!(
            store.try_persist_draft("s1", &values("x")),
            Err(DraftError::Unavailable)
        ));
    }

    #[test]
    fn test_disabled_switch() {
        let store = FormDraftStore::disabled();
        assert!(!store.is_enabled());
        assert!(store.try_persist_draft("s1", &values("x")).is_ok());
        assert_eq!(store.try_read_draft("s1").unwrap(), None);
    }

    #[test]
    fn test_quota_exceeded_is_swallowed() {
        let store = FormDraftStore::new(MemoryStorage::with_quota(16));
        store.persist_draft("s1", &values("far too long for the quota"));
        assert_eq!(store.read_draft("s1"), None);
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(&draft_key("s1"), "{broken").unwrap();
        let store = FormDraftStore::new(storage);
        assert_eq!(store.read_draft("s1"), None);
    }

    #[test]
    fn test_clear_invalidates_older_epoch() {
        let store = FormDraftStore::new(MemoryStorage::new());
        assert!(store.acquire("s1"));
        let epoch = store.epoch("s1");
        store.clear_draft("s1");

        assert!(!store.persist_if_current("s1", epoch, &values("late")));
        assert_eq!(store.read_draft("s1"), None);

        let epoch = store.epoch("s1");
        assert!(store.persist_if_current("s1", epoch, &values("fresh")));
        assert_eq!(store.read_draft("s1"), Some(values("fresh")));
    }

    #[test]
    fn test_released_ids_leave_no_epoch_behind() {
        let store = FormDraftStore::new(MemoryStorage::new());
        for i in 0..100 {
            let id = format!("invite-{i}");
            assert!(store.acquire(&id));
            store.clear_draft(&id);
            assert_eq!(store.epoch(&id), 1);
            store.release(&id);
        }
        assert!(store.shared.epochs.borrow().is_empty());
        assert!(store.shared.active.borrow().is_empty());

        // Clearing an id nobody has attached records nothing.
        store.clear_draft("never-attached");
        assert!(store.shared.epochs.borrow().is_empty());
        assert_eq!(store.epoch("invite-0"), 0);
    }
}
