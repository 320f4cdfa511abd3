//! Per-render field bindings.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// A shared setter closure. Identity is compared with [`Rc::ptr_eq`].
pub type Setter<T> = Rc<dyn Fn(T)>;

/// Metadata of one field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMeta {
    /// Whether the user has interacted with the field.
    pub touched: bool,
    /// Validation error, if any.
    pub error: Option<String>,
    /// Baseline value the field is compared against for dirtiness.
    pub initial_value: Value,
}

/// One field of a [`FormStore`](crate::FormStore) as seen by one render.
///
/// The setters are freshly allocated on every
/// [`FormStore::field`](crate::FormStore::field) call. They act on the store's
/// state at call time and do nothing once the store is gone.
#[derive(Clone)]
pub struct FieldBinding {
    pub name: String,
    pub value: Value,
    pub meta: FieldMeta,
    pub set_value: Setter<Value>,
    pub set_touched: Setter<bool>,
    pub set_error: Setter<Option<String>>,
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
