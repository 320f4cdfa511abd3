//! Tests for stable field handles inside a simulated component tree.

use std::rc::Rc;

use bcn_form::{FormStore, FormValues, Setter, StableField};
use serde_json::{Value, json};

/// A memoized child: it only re-renders when its props change identity.
struct MemoChild {
    last_setter: Option<Setter<Value>>,
    renders: usize,
}

impl MemoChild {
    fn new() -> Self {
        Self {
            last_setter: None,
            renders: 0,
        }
    }

    fn receive(&mut self, setter: &Setter<Value>) {
        let changed = self
            .last_setter
            .as_ref()
            .is_none_or(|last| !Rc::ptr_eq(last, setter));
        if changed {
            self.renders += 1;
            self.last_setter = Some(Rc::clone(setter));
        }
    }
}

fn alert_form() -> FormStore {
    FormStore::new(FormValues::from([
        ("title".to_string(), json!("")),
        ("severity".to_string(), json!("MEDIUM")),
        ("threshold".to_string(), json!(1)),
    ]))
}

#[test]
fn test_raw_bindings_churn_but_stable_handles_do_not() {
    let form = alert_form();
    let mut raw_child = MemoChild::new();
    let mut stable_child = MemoChild::new();
    let mut field = StableField::mount(&form, "title");

    for keystroke in ["a", "al", "ale", "aler", "alert"] {
        raw_child.receive(&form.field("title").set_value);
        stable_child.receive(&field.render().set_value);
        form.set_field_value("title", json!(keystroke));
    }

    assert_eq!(raw_child.renders, 5);
    assert_eq!(stable_child.renders, 1);
}

#[test]
fn test_sibling_fields_are_independent() {
    let form = alert_form();
    let mut title = StableField::mount(&form, "title");
    let mut severity = StableField::mount(&form, "severity");

    let title_handle = title.render();
    let severity_handle = severity.render();
    assert!(!Rc::ptr_eq(&title_handle.set_value, &severity_handle.set_value));

    (severity_handle.set_value)(json!("HIGH"));
    drop(title);

    // Unmounting one field does not affect its sibling.
    (title_handle.set_value)(json!("ignored"));
    (severity_handle.set_touched)(true);

    assert_eq!(form.value("title"), Some(json!("")));
    assert_eq!(form.value("severity"), Some(json!("HIGH")));
    assert!(form.is_touched("severity"));
    assert!(severity.render().meta.touched);
}

#[test]
fn test_setter_may_trigger_rerender_reentrantly() {
    let form = alert_form();
    let field = Rc::new(std::cell::RefCell::new(StableField::mount(&form, "threshold")));
    let handle = field.borrow_mut().render();

    // A subscriber re-renders the field synchronously on every change.
    let rerender = Rc::clone(&field);
    let _sub = form.subscribe(move |_| {
        let _ = rerender.borrow_mut().render();
    });

    (handle.set_value)(json!(10));
    assert_eq!(field.borrow().render_count(), 2);
    assert_eq!(form.value("threshold"), Some(json!(10)));
}
