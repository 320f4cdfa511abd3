use std::fmt;

use bcn_overlay::{Overlay, OverlayClass};

use super::EntityRef;

/// Side-sheet overlays.
#[derive(Debug, Clone, PartialEq)]
pub enum SidesheetOverlay {
    /// Invite a new user to the organization.
    UserInvitation,
    /// Edit the signed-in user's own account.
    EditAccount,
    /// Edit another user's profile and role.
    EditUser { user: EntityRef },
    /// Pick which destinations receive an alert.
    SelectDestinations { selected: Vec<String> },
    /// General organization settings.
    GeneralSettings,
}

/// Side-sheet kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidesheetKind {
    UserInvitation,
    EditAccount,
    EditUser,
    SelectDestinations,
    GeneralSettings,
}

impl SidesheetKind {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInvitation => "USER_INVITATION",
            Self::EditAccount => "EDIT_ACCOUNT",
            Self::EditUser => "EDIT_USER",
            Self::SelectDestinations => "SELECT_DESTINATIONS",
            Self::GeneralSettings => "GENERAL_SETTINGS",
        }
    }

    /// Get the title for this side-sheet kind.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UserInvitation => "Invite User",
            Self::EditAccount => "Edit Profile",
            Self::EditUser => "Edit User",
            Self::SelectDestinations => "Select Destinations",
            Self::GeneralSettings => "General Settings",
        }
    }

    /// Whether the sheet hosts a form that keeps a draft.
    pub fn has_form(&self) -> bool {
        !matches!(self, Self::SelectDestinations)
    }
}

impl fmt::Display for SidesheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Overlay for SidesheetOverlay {
    type Kind = SidesheetKind;
    const CLASS: OverlayClass = OverlayClass::Sidesheet;

    fn kind(&self) -> SidesheetKind {
        match self {
            Self::UserInvitation => SidesheetKind::UserInvitation,
            Self::EditAccount => SidesheetKind::EditAccount,
            Self::EditUser { .. } => SidesheetKind::EditUser,
            Self::SelectDestinations { .. } => SidesheetKind::SelectDestinations,
            Self::GeneralSettings => SidesheetKind::GeneralSettings,
        }
    }

    fn all_kinds() -> &'static [SidesheetKind] {
        &[
            SidesheetKind::UserInvitation,
            SidesheetKind::EditAccount,
            SidesheetKind::EditUser,
            SidesheetKind::SelectDestinations,
            SidesheetKind::GeneralSettings,
        ]
    }
}
