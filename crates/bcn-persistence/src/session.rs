//! One form's draft lifecycle: restore, debounced write, clear.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use bcn_common::{Debouncer, Scheduler, Subscription};
use bcn_form::{FormEvent, FormStore, WeakFormStore};

use crate::store::FormDraftStore;

/// Quiet period before a draft write.
pub const DEFAULT_DRAFT_DEBOUNCE: Duration = Duration::from_millis(250);

struct SessionShared {
    session_id: String,
    store: FormDraftStore,
    form: WeakFormStore,
    debounce: Duration,
    debouncer: RefCell<Debouncer>,
    /// False for a colliding duplicate attach; such a session never restores
    /// and does not release the id on drop.
    owns_id: bool,
}

impl SessionShared {
    fn on_form_event(this: &Rc<Self>, event: &FormEvent) {
        let dirty = match event {
            FormEvent::ValuesChanged { dirty, .. } | FormEvent::BaselineReset { dirty, .. } => {
                *dirty
            }
            FormEvent::TouchedChanged { .. } | FormEvent::ErrorChanged { .. } => return,
        };

        if dirty {
            Self::schedule_write(this);
        } else {
            // Clean again (submitted or reverted): the draft must not linger.
            this.debouncer.borrow_mut().cancel();
            this.store.clear_draft(&this.session_id);
        }
    }

    fn schedule_write(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let epoch = this.store.epoch(&this.session_id);
        this.debouncer.borrow_mut().trigger(this.debounce, move || {
            if let Some(shared) = weak.upgrade() {
                shared.write(epoch);
            }
        });
    }

    fn write(&self, epoch: u64) {
        let Some(form) = self.form.upgrade() else {
            return;
        };
        if !form.is_dirty() {
            return;
        }
        self.store
            .persist_if_current(&self.session_id, epoch, &form.values());
    }
}

impl Drop for SessionShared {
    fn drop(&mut self) {
        if self.owns_id {
            self.store.release(&self.session_id);
        }
    }
}

/// Binds one form instance to its draft.
///
/// Attaching restores the stored draft synchronously, before the caller gets
/// the session back and therefore before the form can receive input. After
/// that, every change while dirty re-arms a debounced write of the full value
/// set, and a transition back to clean deletes the draft. Dropping the
/// session (unmount) cancels any pending write; the stored draft stays for
/// the next mount.
pub struct DraftSession {
    shared: Rc<SessionShared>,
    restored: bool,
    _subscription: Subscription,
}

impl fmt::Debug for DraftSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftSession")
            .field("session_id", &self.shared.session_id)
            .field("restored", &self.restored)
            .field("pending_write", &self.has_pending_write())
            .finish()
    }
}

impl DraftSession {
    /// Restore `form` from the draft stored under `session_id` and start
    /// tracking its changes.
    pub fn attach(
        form: &FormStore,
        store: &FormDraftStore,
        scheduler: &Scheduler,
        session_id: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        let session_id = session_id.into();
        let owns_id = store.acquire(&session_id);

        let mut restored = false;
        if !owns_id {
            // Two live forms sharing one id would cross-contaminate; the
            // newcomer starts from its defaults instead of restoring.
            tracing::warn!(session_id = %session_id, "draft session id already attached, skipping restore");
        } else if let Some(values) = store.read_draft(&session_id) {
            let applied = form.restore_values(values);
            restored = true;
            tracing::info!(session_id = %session_id, applied, "restored form draft");
            if !form.is_dirty() {
                // Nothing left to recover once stale fields are dropped.
                store.clear_draft(&session_id);
            }
        }

        let shared = Rc::new(SessionShared {
            session_id,
            store: store.clone(),
            form: form.downgrade(),
            debounce,
            debouncer: RefCell::new(Debouncer::new(scheduler)),
            owns_id,
        });

        let weak = Rc::downgrade(&shared);
        let subscription = form.subscribe(move |event| {
            if let Some(shared) = weak.upgrade() {
                SessionShared::on_form_event(&shared, event);
            }
        });

        Self {
            shared,
            restored,
            _subscription: subscription,
        }
    }

    /// The session id.
    pub fn session_id(&self) -> &str {
        &self.shared.session_id
    }

    /// Whether a stored draft was applied on attach.
    pub fn was_restored(&self) -> bool {
        self.restored
    }

    /// Whether a debounced write is waiting.
    pub fn has_pending_write(&self) -> bool {
        self.shared.debouncer.borrow().is_pending()
    }

    /// Discard the draft now (e.g. "Cancel"). No debounce.
    pub fn clear(&self) {
        self.shared.debouncer.borrow_mut().cancel();
        self.shared.store.clear_draft(&self.shared.session_id);
    }

    /// Write immediately instead of waiting for the quiet period.
    ///
    /// Meant for the host's "about to close" hook. Does nothing when clean.
    pub fn flush(&self) {
        self.shared.debouncer.borrow_mut().cancel();
        let epoch = self.shared.store.epoch(&self.shared.session_id);
        self.shared.write(epoch);
    }
}
