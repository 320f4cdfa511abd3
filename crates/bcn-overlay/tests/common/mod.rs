//! Small overlay catalog shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bcn_overlay::{Overlay, OverlayClass, OverlayContext, OverlayRenderer};

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    DeleteRule { rule_id: String },
    DeletePolicy { policy_id: String },
    NetworkError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    DeleteRule,
    DeletePolicy,
    NetworkError,
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DeleteRule => "DELETE_RULE",
            Self::DeletePolicy => "DELETE_POLICY",
            Self::NetworkError => "NETWORK_ERROR",
        })
    }
}

impl Overlay for Modal {
    type Kind = ModalKind;
    const CLASS: OverlayClass = OverlayClass::Modal;

    fn kind(&self) -> ModalKind {
        match self {
            Self::DeleteRule { .. } => ModalKind::DeleteRule,
            Self::DeletePolicy { .. } => ModalKind::DeletePolicy,
            Self::NetworkError => ModalKind::NetworkError,
        }
    }

    fn all_kinds() -> &'static [ModalKind] {
        &[
            ModalKind::DeleteRule,
            ModalKind::DeletePolicy,
            ModalKind::NetworkError,
        ]
    }
}

pub fn delete_rule(id: &str) -> Modal {
    Modal::DeleteRule {
        rule_id: id.to_string(),
    }
}

/// Renders to a string and records every render.
#[derive(Default)]
pub struct Recorder {
    pub log: Rc<RefCell<Vec<String>>>,
}

impl OverlayRenderer<Modal> for Recorder {
    type Output = String;

    fn render(&self, overlay: &Modal, ctx: &OverlayContext<Modal>) -> Option<String> {
        let text = match overlay {
            Modal::DeleteRule { rule_id } => format!("delete rule {rule_id}"),
            Modal::DeletePolicy { policy_id } => format!("delete policy {policy_id}"),
            Modal::NetworkError => "network error".to_string(),
        };
        let text = if ctx.is_visible() {
            text
        } else {
            format!("{text} (exiting)")
        };
        self.log.borrow_mut().push(text.clone());
        Some(text)
    }
}
