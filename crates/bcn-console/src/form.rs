//! A form wired to drafts and autosave.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bcn_common::Scheduler;
use bcn_form::{FormStore, FormValues, StableField, WeakFormStore};
use bcn_persistence::{AutoSaveConfig, Autosave, DirtyTracker, DraftSession, FormDraftStore};

type SubmitFn = Box<dyn FnMut(&FormValues) -> anyhow::Result<()>>;

/// Options for [`Console::mount_form`](crate::Console::mount_form).
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Keep a draft under this session id.
    pub session_id: Option<String>,
    /// Submit automatically after changes settle.
    pub autosave: bool,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a draft under `session_id`.
    #[must_use]
    pub fn with_draft(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Enable autosave.
    #[must_use]
    pub fn with_autosave(mut self) -> Self {
        self.autosave = true;
        self
    }
}

/// Runs the caller's submit routine and moves the baseline on success.
struct Submitter {
    form: WeakFormStore,
    submit: RefCell<SubmitFn>,
}

impl Submitter {
    fn run(&self) -> anyhow::Result<()> {
        let Some(form) = self.form.upgrade() else {
            return Ok(());
        };
        let Ok(mut submit) = self.submit.try_borrow_mut() else {
            anyhow::bail!("a submit is already running");
        };
        let values = form.values();
        submit(&values)?;
        drop(submit);

        // Submitted values are the new clean state; this also deletes the draft.
        form.reset_baseline();
        Ok(())
    }
}

/// One mounted form with its optional draft session and autosave.
///
/// Dropping it unmounts the form: pending draft writes and autosave submits
/// are cancelled, and a stored draft stays for the next mount.
pub struct ManagedForm {
    draft: Option<DraftSession>,
    autosave: Option<Autosave>,
    submitter: Rc<Submitter>,
    form: FormStore,
}

impl fmt::Debug for ManagedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedForm")
            .field("form", &self.form)
            .field("draft", &self.draft)
            .field("autosave", &self.autosave)
            .finish()
    }
}

impl ManagedForm {
    pub(crate) fn mount<F>(
        initial: FormValues,
        options: &FormOptions,
        drafts: &FormDraftStore,
        scheduler: &Scheduler,
        draft_debounce: std::time::Duration,
        autosave_config: &AutoSaveConfig,
        submit: F,
    ) -> Self
    where
        F: FnMut(&FormValues) -> anyhow::Result<()> + 'static,
    {
        let form = FormStore::new(initial);

        // Restore runs here, before the caller can hand the form to any input.
        let draft = options.session_id.as_ref().map(|session_id| {
            DraftSession::attach(&form, drafts, scheduler, session_id.clone(), draft_debounce)
        });

        let submitter = Rc::new(Submitter {
            form: form.downgrade(),
            submit: RefCell::new(Box::new(submit)),
        });

        let autosave = if options.autosave {
            let runner = Rc::clone(&submitter);
            Autosave::from_config(autosave_config, &form, scheduler, move |_| runner.run())
        } else {
            None
        };

        Self {
            draft,
            autosave,
            submitter,
            form,
        }
    }

    /// The underlying form-state store.
    pub fn form(&self) -> &FormStore {
        &self.form
    }

    /// Bind a field for an input component.
    pub fn field(&self, name: impl Into<String>) -> StableField {
        StableField::mount(&self.form, name)
    }

    /// Whether the form differs from its last submitted state.
    pub fn is_dirty(&self) -> bool {
        self.form.is_dirty()
    }

    /// The draft session, when drafts are on for this form.
    pub fn draft(&self) -> Option<&DraftSession> {
        self.draft.as_ref()
    }

    /// The autosave, when enabled for this form.
    pub fn autosave(&self) -> Option<&Autosave> {
        self.autosave.as_ref()
    }

    /// Autosave progress, when autosave is enabled.
    pub fn autosave_status(&self) -> Option<DirtyTracker> {
        self.autosave.as_ref().map(|autosave| autosave.status().clone())
    }

    /// Explicit submit. On success the form becomes clean and its draft is
    /// deleted; on failure nothing changes and the error is returned.
    pub fn submit(&self) -> anyhow::Result<()> {
        if let Some(autosave) = &self.autosave {
            autosave.cancel();
        }
        self.submitter.run()
    }

    /// Discard edits ("Cancel"): the draft is deleted before this returns.
    pub fn cancel(&self) {
        if let Some(draft) = &self.draft {
            draft.clear();
        }
        self.form.reset();
        if let Some(autosave) = &self.autosave {
            autosave.cancel();
        }
    }
}
