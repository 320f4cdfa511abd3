//! Referentially stable field bindings.
//!
//! [`FormStore::field`] hands out new setter closures on every render. Passing
//! those straight to a deep component tree makes every consumer see "changed"
//! setters on every keystroke. [`StableField`] fixes that with one indirection
//! cell per setter kind: the cell holds the latest delegate, and a forwarding
//! closure allocated once at mount reads the cell at call time.
//!
//! The cell is written during [`StableField::render`], before the handle is
//! returned, so no event can observe a stale delegate between render and use.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::binding::{FieldMeta, Setter};
use crate::store::FormStore;

/// Holds the delegate of the most recent render.
struct DelegateCell<T> {
    current: RefCell<Option<Setter<T>>>,
}

impl<T> DelegateCell<T> {
    fn new() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }

    fn replace(&self, delegate: Setter<T>) {
        *self.current.borrow_mut() = Some(delegate);
    }

    fn clear(&self) {
        self.current.borrow_mut().take();
    }

    /// Call the latest delegate. Returns `false` after teardown.
    fn forward(&self, value: T) -> bool {
        // Clone out first so the delegate may re-enter and re-render.
        let delegate = self.current.borrow().clone();
        match delegate {
            Some(delegate) => {
                delegate(value);
                true
            }
            None => false,
        }
    }
}

fn forwarder<T: 'static>(cell: &Rc<DelegateCell<T>>, field: &str, setter: &'static str) -> Setter<T> {
    let cell = Rc::clone(cell);
    let field = field.to_string();
    Rc::new(move |value: T| {
        if !cell.forward(value) {
            tracing::trace!(field = %field, setter, "setter called after unmount, ignored");
        }
    })
}

/// A field handle whose setters never change identity while mounted.
///
/// `value` and `meta` are the snapshot of the render that produced the
/// handle. The setters act on the store's state at call time, whichever
/// render they were taken from.
#[derive(Clone)]
pub struct StableFieldHandle {
    pub name: String,
    pub value: Value,
    pub meta: FieldMeta,
    pub set_value: Setter<Value>,
    pub set_touched: Setter<bool>,
    pub set_error: Setter<Option<String>>,
}

impl StableFieldHandle {
    /// Decode the value into a concrete type.
    pub fn value_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.value.clone()).ok()
    }
}

impl fmt::Debug for StableFieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableFieldHandle")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// The field stabilizer for one mounted input.
///
/// Mount it once per component instance, call [`render`](Self::render) on
/// every render, and drop it on unmount. After drop, setters taken from any of
/// its handles are silent no-ops.
pub struct StableField {
    name: String,
    form: FormStore,
    value_cell: Rc<DelegateCell<Value>>,
    touched_cell: Rc<DelegateCell<bool>>,
    error_cell: Rc<DelegateCell<Option<String>>>,
    set_value: Setter<Value>,
    set_touched: Setter<bool>,
    set_error: Setter<Option<String>>,
    renders: u64,
}

impl fmt::Debug for StableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableField")
            .field("name", &self.name)
            .field("renders", &self.renders)
            .finish_non_exhaustive()
    }
}

impl StableField {
    /// Mount a stabilizer for `name` on `form`.
    pub fn mount(form: &FormStore, name: impl Into<String>) -> Self {
        let name = name.into();
        let value_cell = Rc::new(DelegateCell::new());
        let touched_cell = Rc::new(DelegateCell::new());
        let error_cell = Rc::new(DelegateCell::new());

        Self {
            set_value: forwarder(&value_cell, &name, "set_value"),
            set_touched: forwarder(&touched_cell, &name, "set_touched"),
            set_error: forwarder(&error_cell, &name, "set_error"),
            value_cell,
            touched_cell,
            error_cell,
            form: form.clone(),
            name,
            renders: 0,
        }
    }

    /// Produce the handle for this render.
    pub fn render(&mut self) -> StableFieldHandle {
        let binding = self.form.field(&self.name);
        self.value_cell.replace(binding.set_value);
        self.touched_cell.replace(binding.set_touched);
        self.error_cell.replace(binding.set_error);
        self.renders += 1;

        StableFieldHandle {
            name: binding.name,
            value: binding.value,
            meta: binding.meta,
            set_value: Rc::clone(&self.set_value),
            set_touched: Rc::clone(&self.set_touched),
            set_error: Rc::clone(&self.set_error),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

impl Drop for StableField {
    fn drop(&mut self) {
        self.value_cell.clear();
        self.touched_cell.clear();
        self.error_cell.clear();
    }
}
