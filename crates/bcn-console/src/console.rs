//! The console's bootstrap context.

use std::fmt;
use std::time::Instant;

use bcn_common::Scheduler;
use bcn_form::FormValues;
use bcn_overlay::{OverlayClass, OverlayManager, OverlayRegistry, OverlayRenderer, OverlayStore};
use bcn_persistence::FormDraftStore;

use crate::catalog::{ModalOverlay, SidesheetOverlay};
use crate::error::Result;
use crate::form::{FormOptions, ManagedForm};
use crate::settings::ConsoleSettings;

/// Everything the UI-state core shares across the application.
///
/// Created once at startup and handed down to views. Holds the two overlay
/// stores, the draft store and the scheduler that the host's tick drives.
/// Cloning shares the same state.
#[derive(Clone)]
pub struct Console {
    settings: ConsoleSettings,
    scheduler: Scheduler,
    modals: OverlayStore<ModalOverlay>,
    sidesheets: OverlayStore<SidesheetOverlay>,
    drafts: FormDraftStore,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("modal", &self.modals.kind())
            .field("sidesheet", &self.sidesheets.kind())
            .field("drafts", &self.drafts)
            .field("pending_timers", &self.scheduler.pending())
            .finish()
    }
}

impl Console {
    /// Bootstrap from settings.
    pub fn new(settings: ConsoleSettings) -> Self {
        let drafts = settings.drafts.build_store();
        Self::with_parts(settings, Scheduler::new(), drafts)
    }

    /// Bootstrap with an explicit scheduler and draft store.
    pub fn with_parts(settings: ConsoleSettings, scheduler: Scheduler, drafts: FormDraftStore) -> Self {
        tracing::debug!(
            drafts = drafts.is_enabled(),
            autosave = settings.autosave.enabled,
            "console state initialized"
        );
        Self {
            settings,
            scheduler,
            modals: OverlayStore::new(),
            sidesheets: OverlayStore::new(),
            drafts,
        }
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn modals(&self) -> &OverlayStore<ModalOverlay> {
        &self.modals
    }

    pub fn sidesheets(&self) -> &OverlayStore<SidesheetOverlay> {
        &self.sidesheets
    }

    pub fn drafts(&self) -> &FormDraftStore {
        &self.drafts
    }

    /// Run timers due by `now`. Call from the host's frame or tick.
    pub fn tick(&self, now: Instant) -> usize {
        self.scheduler.advance_to(now)
    }

    // =========================================================================
    // OVERLAYS
    // =========================================================================

    /// Show a modal, replacing any other.
    pub fn show_modal(&self, modal: ModalOverlay) {
        self.modals.show(modal);
    }

    /// Show a side sheet, replacing any other.
    pub fn show_sidesheet(&self, sidesheet: SidesheetOverlay) {
        self.sidesheets.show(sidesheet);
    }

    /// Start closing the overlay of `class`.
    pub fn hide_overlay(&self, class: OverlayClass) {
        match class {
            OverlayClass::Modal => self.modals.hide(),
            OverlayClass::Sidesheet => self.sidesheets.hide(),
        }
    }

    /// Whether an overlay of `class` is visible.
    pub fn is_overlay_visible(&self, class: OverlayClass) -> bool {
        match class {
            OverlayClass::Modal => self.modals.is_visible(),
            OverlayClass::Sidesheet => self.sidesheets.is_visible(),
        }
    }

    /// Manager rendering the modal store through `renderer`.
    pub fn modal_manager<R>(&self, renderer: R) -> OverlayManager<ModalOverlay, R>
    where
        R: OverlayRenderer<ModalOverlay>,
    {
        OverlayManager::new(&self.modals, renderer)
    }

    /// Manager rendering the side-sheet store through `renderer`.
    pub fn sidesheet_manager<R>(&self, renderer: R) -> OverlayManager<SidesheetOverlay, R>
    where
        R: OverlayRenderer<SidesheetOverlay>,
    {
        OverlayManager::new(&self.sidesheets, renderer)
    }

    /// Both managers from runtime registries, after checking that every
    /// kind has a view.
    #[allow(clippy::type_complexity)]
    pub fn registered_managers<Out>(
        &self,
        modals: OverlayRegistry<ModalOverlay, Out>,
        sidesheets: OverlayRegistry<SidesheetOverlay, Out>,
    ) -> Result<(
        OverlayManager<ModalOverlay, OverlayRegistry<ModalOverlay, Out>>,
        OverlayManager<SidesheetOverlay, OverlayRegistry<SidesheetOverlay, Out>>,
    )> {
        modals.verify()?;
        sidesheets.verify()?;
        Ok((self.modal_manager(modals), self.sidesheet_manager(sidesheets)))
    }

    // =========================================================================
    // FORMS
    // =========================================================================

    /// Mount a form with the draft and autosave behavior from `options`.
    ///
    /// A stored draft is applied before this returns. `submit` backs both
    /// [`ManagedForm::submit`] and autosave.
    pub fn mount_form<F>(&self, initial: FormValues, options: &FormOptions, submit: F) -> ManagedForm
    where
        F: FnMut(&FormValues) -> anyhow::Result<()> + 'static,
    {
        ManagedForm::mount(
            initial,
            options,
            &self.drafts,
            &self.scheduler,
            self.settings.drafts.debounce(),
            &self.settings.autosave,
            submit,
        )
    }

    /// Close all overlays immediately (sign-out, test teardown).
    pub fn reset(&self) {
        self.modals.reset();
        self.sidesheets.reset();
    }
}
