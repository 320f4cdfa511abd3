//! The form-state store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use bcn_common::{Listeners, Subscription};
use serde_json::Value;

use crate::binding::{FieldBinding, FieldMeta};

/// Field values by field name.
pub type FormValues = BTreeMap<String, Value>;

/// Change notification emitted by a [`FormStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// One or more values changed.
    ValuesChanged { revision: u64, dirty: bool },
    /// A field's touched flag changed.
    TouchedChanged { field: String, touched: bool },
    /// A field's error changed.
    ErrorChanged { field: String, error: Option<String> },
    /// The baseline moved (e.g. after a successful submit).
    BaselineReset { revision: u64, dirty: bool },
}

#[derive(Debug, Default)]
struct FormState {
    initial: FormValues,
    values: FormValues,
    touched: BTreeMap<String, bool>,
    errors: BTreeMap<String, String>,
    /// Bumped on every value or baseline change.
    revision: u64,
}

impl FormState {
    fn is_dirty(&self) -> bool {
        self.values != self.initial
    }
}

struct FormShared {
    state: RefCell<FormState>,
    listeners: Listeners<FormEvent>,
}

/// Reactive store for one form instance.
///
/// Clones share state. Every mutation notifies subscribers synchronously after
/// the state borrow is released, so subscribers may read or mutate the store.
/// A mutation made from inside a subscriber is announced after the current
/// event has reached every subscriber, so events always arrive in mutation
/// order.
#[derive(Clone)]
pub struct FormStore {
    shared: Rc<FormShared>,
}

/// Non-owning reference to a [`FormStore`].
#[derive(Clone, Default)]
pub struct WeakFormStore(Weak<FormShared>);

impl WeakFormStore {
    /// Get the store back, if it is still alive.
    pub fn upgrade(&self) -> Option<FormStore> {
        self.0.upgrade().map(|shared| FormStore { shared })
    }
}

impl fmt::Debug for WeakFormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakFormStore")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("FormStore")
            .field("revision", &state.revision)
            .field("dirty", &state.is_dirty())
            .field("fields", &state.values.len())
            .finish()
    }
}

impl FormStore {
    /// Create a clean form whose baseline is `initial`.
    pub fn new(initial: FormValues) -> Self {
        Self {
            shared: Rc::new(FormShared {
                state: RefCell::new(FormState {
                    values: initial.clone(),
                    initial,
                    ..FormState::default()
                }),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Non-owning handle for callbacks that must not keep the form alive.
    pub fn downgrade(&self) -> WeakFormStore {
        WeakFormStore(Rc::downgrade(&self.shared))
    }

    /// Whether `self` and `other` are the same form instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Copy of all current values.
    pub fn values(&self) -> FormValues {
        self.shared.state.borrow().values.clone()
    }

    /// Copy of the baseline values.
    pub fn initial_values(&self) -> FormValues {
        self.shared.state.borrow().initial.clone()
    }

    /// Current value of one field.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.shared.state.borrow().values.get(name).cloned()
    }

    /// Names of the fields declared by the baseline.
    pub fn field_names(&self) -> Vec<String> {
        self.shared.state.borrow().initial.keys().cloned().collect()
    }

    /// Whether the values differ from the baseline.
    pub fn is_dirty(&self) -> bool {
        self.shared.state.borrow().is_dirty()
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.shared.state.borrow().revision
    }

    /// Whether the field has been touched.
    pub fn is_touched(&self, name: &str) -> bool {
        self.shared
            .state
            .borrow()
            .touched
            .get(name)
            .copied()
            .unwrap_or(false)
    }

    /// Validation error of the field.
    pub fn error(&self, name: &str) -> Option<String> {
        self.shared.state.borrow().errors.get(name).cloned()
    }

    /// Bind one field for the current render.
    ///
    /// The returned setters are new allocations on every call.
    pub fn field(&self, name: &str) -> FieldBinding {
        let (value, meta) = {
            let state = self.shared.state.borrow();
            (
                state.values.get(name).cloned().unwrap_or(Value::Null),
                FieldMeta {
                    touched: state.touched.get(name).copied().unwrap_or(false),
                    error: state.errors.get(name).cloned(),
                    initial_value: state.initial.get(name).cloned().unwrap_or(Value::Null),
                },
            )
        };

        let weak = self.downgrade();
        let field = name.to_string();
        let set_value = Rc::new(move |value: Value| {
            if let Some(form) = weak.upgrade() {
                form.set_field_value(&field, value);
            }
        });

        let weak = self.downgrade();
        let field = name.to_string();
        let set_touched = Rc::new(move |touched: bool| {
            if let Some(form) = weak.upgrade() {
                form.set_field_touched(&field, touched);
            }
        });

        let weak = self.downgrade();
        let field = name.to_string();
        let set_error = Rc::new(move |error: Option<String>| {
            if let Some(form) = weak.upgrade() {
                form.set_field_error(&field, error);
            }
        });

        FieldBinding {
            name: name.to_string(),
            value,
            meta,
            set_value,
            set_touched,
            set_error,
        }
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Set one field's value. Setting an identical value emits nothing.
    pub fn set_field_value(&self, name: &str, value: Value) {
        let event = {
            let mut state = self.shared.state.borrow_mut();
            if state.values.get(name) == Some(&value) {
                return;
            }
            state.values.insert(name.to_string(), value);
            state.revision += 1;
            FormEvent::ValuesChanged {
                revision: state.revision,
                dirty: state.is_dirty(),
            }
        };
        self.shared.listeners.emit(&event);
    }

    /// Set one field's touched flag.
    pub fn set_field_touched(&self, name: &str, touched: bool) {
        {
            let mut state = self.shared.state.borrow_mut();
            let previous = state.touched.insert(name.to_string(), touched);
            if previous.unwrap_or(false) == touched {
                return;
            }
        }
        self.shared.listeners.emit(&FormEvent::TouchedChanged {
            field: name.to_string(),
            touched,
        });
    }

    /// Set or clear one field's validation error.
    pub fn set_field_error(&self, name: &str, error: Option<String>) {
        {
            let mut state = self.shared.state.borrow_mut();
            let previous = match &error {
                Some(message) => state.errors.insert(name.to_string(), message.clone()),
                None => state.errors.remove(name),
            };
            if previous == error {
                return;
            }
        }
        self.shared.listeners.emit(&FormEvent::ErrorChanged {
            field: name.to_string(),
            error,
        });
    }

    /// Replace the entire value set.
    pub fn set_values(&self, values: FormValues) {
        let event = {
            let mut state = self.shared.state.borrow_mut();
            if state.values == values {
                return;
            }
            state.values = values;
            state.revision += 1;
            FormEvent::ValuesChanged {
                revision: state.revision,
                dirty: state.is_dirty(),
            }
        };
        self.shared.listeners.emit(&event);
    }

    /// Overwrite declared fields from a saved snapshot.
    ///
    /// Fields of `snapshot` that the baseline does not declare are dropped;
    /// declared fields missing from `snapshot` keep their current value.
    /// Returns the number of fields taken from the snapshot.
    pub fn restore_values(&self, snapshot: FormValues) -> usize {
        let mut values = self.values();
        let mut applied = 0;
        let mut dropped = 0;
        for (name, value) in snapshot {
            match values.get_mut(&name) {
                Some(slot) => {
                    *slot = value;
                    applied += 1;
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(applied, dropped, "dropped fields the form no longer declares");
        }
        self.set_values(values);
        applied
    }

    /// Make the current values the new baseline. The form becomes clean.
    pub fn reset_baseline(&self) {
        let event = {
            let mut state = self.shared.state.borrow_mut();
            state.initial = state.values.clone();
            state.revision += 1;
            FormEvent::BaselineReset {
                revision: state.revision,
                dirty: false,
            }
        };
        self.shared.listeners.emit(&event);
    }

    /// Discard edits: values return to the baseline, touched and errors clear.
    pub fn reset(&self) {
        let event = {
            let mut state = self.shared.state.borrow_mut();
            state.values = state.initial.clone();
            state.touched.clear();
            state.errors.clear();
            state.revision += 1;
            FormEvent::ValuesChanged {
                revision: state.revision,
                dirty: false,
            }
        };
        self.shared.listeners.emit(&event);
    }

    /// Observe every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FormEvent) + 'static,
    {
        self.shared.listeners.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> FormStore {
        FormStore::new(FormValues::from([
            ("name".to_string(), json!("")),
            ("severity".to_string(), json!("INFO")),
        ]))
    }

    #[test]
    fn test_dirty_follows_baseline() {
        let form = form();
        assert!(!form.is_dirty());

        form.set_field_value("name", json!("rule"));
        assert!(form.is_dirty());

        form.set_field_value("name", json!(""));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_identical_value_emits_nothing() {
        let form = form();
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&events);
        let _sub = form.subscribe(move |event| e.borrow_mut().push(event.clone()));

        form.set_field_value("severity", json!("INFO"));
        form.set_field_touched("severity", false);
        form.set_field_error("severity", None);
        assert!(events.borrow().is_empty());

        form.set_field_value("severity", json!("HIGH"));
        assert_eq!(
            *events.borrow(),
            vec![FormEvent::ValuesChanged {
                revision: 1,
                dirty: true
            }]
        );
    }

    #[test]
    fn test_restore_drops_undeclared_fields() {
        let form = form();
        let applied = form.restore_values(FormValues::from([
            ("name".to_string(), json!("restored")),
            ("removed_field".to_string(), json!(true)),
        ]));

        assert_eq!(applied, 1);
        assert_eq!(form.value("name"), Some(json!("restored")));
        assert_eq!(form.value("severity"), Some(json!("INFO")));
        assert_eq!(form.value("removed_field"), None);
    }

    #[test]
    fn test_reset_baseline_makes_clean() {
        let form = form();
        form.set_field_value("name", json!("x"));
        form.reset_baseline();
        assert!(!form.is_dirty());
        assert_eq!(form.initial_values()["name"], json!("x"));
    }

    #[test]
    fn test_reset_discards_edits_and_meta() {
        let form = form();
        form.set_field_value("name", json!("x"));
        form.set_field_touched("name", true);
        form.set_field_error("name", Some("too short".into()));
        form.reset();

        assert!(!form.is_dirty());
        assert!(!form.is_touched("name"));
        assert_eq!(form.error("name"), None);
    }

    #[test]
    fn test_binding_setters_are_fresh_and_weak() {
        let form = form();
        let first = form.field("name");
        let second = form.field("name");
        assert!(!Rc::ptr_eq(&first.set_value, &second.set_value));

        (first.set_value)(json!("via binding"));
        assert_eq!(form.value("name"), Some(json!("via binding")));

        drop(form);
        // The store is gone: calling the setter is a no-op.
        (second.set_value)(json!("ignored"));
    }
}
