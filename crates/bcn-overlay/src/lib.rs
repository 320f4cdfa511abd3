//! Application-wide overlay arbitration.
//!
//! An overlay is a modal dialog or a slide-in side sheet. Each overlay class
//! has exactly one [`OverlayStore`] for the lifetime of the application, and
//! each store shows at most one overlay at a time. The two classes are
//! independent: a modal may sit on top of an open side sheet.
//!
//! # Lifecycle
//!
//! ```text
//! CLOSED --show--> OPEN --hide--> CLOSING --exit complete--> CLOSED
//!                   ^                |
//!                   +------show------+   (newest request wins)
//! ```
//!
//! While CLOSING the descriptor is invisible but keeps the last kind and
//! props, so exit transitions can still draw the payload.
//!
//! # Architecture
//!
//! - `overlay.rs` - the [`Overlay`] trait: a tagged union with a kind discriminant
//! - `descriptor.rs` - [`OverlayDescriptor`] snapshots and [`OverlayPhase`]
//! - `store.rs` - [`OverlayStore`] and the [`OverlayContext`] handed to renderers
//! - `registry.rs` - [`OverlayRenderer`] and the runtime [`OverlayRegistry`]
//! - `manager.rs` - [`OverlayManager`], the subscriber that renders the active overlay
//! - `error.rs` - registration errors

mod descriptor;
mod error;
mod manager;
mod overlay;
mod registry;
mod store;

pub use descriptor::{OverlayDescriptor, OverlayPhase};
pub use error::{OverlayError, Result};
pub use manager::OverlayManager;
pub use overlay::{Overlay, OverlayClass};
pub use registry::{OverlayRegistry, OverlayRenderer};
pub use store::{OverlayContext, OverlayStore};
