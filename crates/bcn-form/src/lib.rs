//! Form state for the Beacon Console state core.
//!
//! - [`FormStore`] - the form-state store: values, baseline, touched/error
//!   metadata, and a synchronous change feed ([`FormEvent`])
//! - [`FieldBinding`] - one field as seen by one render; its setters are new
//!   closures on every call
//! - [`StableField`] - wraps the churning binding and re-exposes it through a
//!   [`StableFieldHandle`] whose setters keep their identity for the whole
//!   mount lifetime

mod binding;
mod stable;
mod store;

pub use binding::{FieldBinding, FieldMeta, Setter};
pub use stable::{StableField, StableFieldHandle};
pub use store::{FormEvent, FormStore, FormValues, WeakFormStore};
