use std::fmt;

use bcn_overlay::{Overlay, OverlayClass};

use super::EntityRef;

/// Modal overlays.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalOverlay {
    /// Confirm deletion of a detection rule.
    DeleteRule { rule: EntityRef },
    /// Confirm deletion of a policy.
    DeletePolicy { policy: EntityRef },
    /// Confirm deletion of an alert destination.
    DeleteDestination { destination: EntityRef },
    /// Confirm deletion of a global helper module.
    DeleteGlobalModule { module: EntityRef },
    /// Confirm removal of a user.
    DeleteUser { user: EntityRef },
    /// Confirm a password reset for a user.
    ResetUserPassword { user: EntityRef },
    /// Lost connection to the backend.
    NetworkError { message: String },
    /// Ask for analytics consent on first login.
    AnalyticsConsent,
}

/// Modal kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    DeleteRule,
    DeletePolicy,
    DeleteDestination,
    DeleteGlobalModule,
    DeleteUser,
    ResetUserPassword,
    NetworkError,
    AnalyticsConsent,
}

impl ModalKind {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeleteRule => "DELETE_RULE",
            Self::DeletePolicy => "DELETE_POLICY",
            Self::DeleteDestination => "DELETE_DESTINATION",
            Self::DeleteGlobalModule => "DELETE_GLOBAL_MODULE",
            Self::DeleteUser => "DELETE_USER",
            Self::ResetUserPassword => "RESET_USER_PASSWORD",
            Self::NetworkError => "NETWORK_ERROR",
            Self::AnalyticsConsent => "ANALYTICS_CONSENT",
        }
    }

    /// Get the title for this modal kind.
    pub fn title(&self) -> &'static str {
        match self {
            Self::DeleteRule => "Delete Rule",
            Self::DeletePolicy => "Delete Policy",
            Self::DeleteDestination => "Delete Destination",
            Self::DeleteGlobalModule => "Delete Global Module",
            Self::DeleteUser => "Delete User",
            Self::ResetUserPassword => "Reset Password",
            Self::NetworkError => "Connection Lost",
            Self::AnalyticsConsent => "Help Us Improve",
        }
    }

    /// Whether confirming this modal destroys data.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DeleteRule
                | Self::DeletePolicy
                | Self::DeleteDestination
                | Self::DeleteGlobalModule
                | Self::DeleteUser
        )
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Overlay for ModalOverlay {
    type Kind = ModalKind;
    const CLASS: OverlayClass = OverlayClass::Modal;

    fn kind(&self) -> ModalKind {
        match self {
            Self::DeleteRule { .. } => ModalKind::DeleteRule,
            Self::DeletePolicy { .. } => ModalKind::DeletePolicy,
            Self::DeleteDestination { .. } => ModalKind::DeleteDestination,
            Self::DeleteGlobalModule { .. } => ModalKind::DeleteGlobalModule,
            Self::DeleteUser { .. } => ModalKind::DeleteUser,
            Self::ResetUserPassword { .. } => ModalKind::ResetUserPassword,
            Self::NetworkError { .. } => ModalKind::NetworkError,
            Self::AnalyticsConsent => ModalKind::AnalyticsConsent,
        }
    }

    fn all_kinds() -> &'static [ModalKind] {
        &[
            ModalKind::DeleteRule,
            ModalKind::DeletePolicy,
            ModalKind::DeleteDestination,
            ModalKind::DeleteGlobalModule,
            ModalKind::DeleteUser,
            ModalKind::ResetUserPassword,
            ModalKind::NetworkError,
            ModalKind::AnalyticsConsent,
        ]
    }
}
