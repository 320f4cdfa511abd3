//! Tests for overlay managers and registries.

mod common;

use bcn_overlay::{OverlayError, OverlayManager, OverlayPhase, OverlayRegistry, OverlayStore};

use common::{Modal, ModalKind, Recorder, delete_rule};

#[test]
fn test_delete_rule_lifecycle() {
    let store = OverlayStore::new();
    let manager = OverlayManager::new(&store, Recorder::default());
    assert_eq!(manager.render(), None);

    store.show(delete_rule("r1"));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.kind(), Some(ModalKind::DeleteRule));
    assert!(snapshot.is_visible());
    assert_eq!(manager.render().as_deref(), Some("delete rule r1"));

    store.hide();
    let snapshot = store.snapshot();
    assert!(!snapshot.is_visible());
    assert_eq!(snapshot.kind(), Some(ModalKind::DeleteRule));
    assert_eq!(manager.phase(), OverlayPhase::Closing);
    assert_eq!(manager.render().as_deref(), Some("delete rule r1 (exiting)"));

    assert!(store.complete_exit(snapshot.generation()));
    assert_eq!(store.kind(), None);
    assert_eq!(manager.phase(), OverlayPhase::Closed);
    assert_eq!(manager.render(), None);
}

#[test]
fn test_newest_request_wins() {
    let store = OverlayStore::new();
    let manager = OverlayManager::new(&store, Recorder::default());

    store.show(delete_rule("r1"));
    manager.render();
    store.show(Modal::NetworkError);
    manager.render();
    manager.render();

    assert_eq!(store.kind(), Some(ModalKind::NetworkError));
    let log = manager.renderer().log.borrow().clone();
    assert_eq!(log, vec!["delete rule r1", "network error", "network error"]);
}

#[test]
fn test_manager_sees_hide_made_by_earlier_listener() {
    let store = OverlayStore::new();

    // An analytics hook subscribed before the manager dismisses every modal.
    let handle = store.clone();
    let _dismiss = store.subscribe(move |d| {
        if d.is_visible() {
            handle.hide();
        }
    });
    let manager = OverlayManager::new(&store, Recorder::default());

    store.show(delete_rule("r1"));
    assert_eq!(store.phase(), OverlayPhase::Closing);
    assert_eq!(manager.phase(), OverlayPhase::Closing);
    assert_eq!(manager.render().as_deref(), Some("delete rule r1 (exiting)"));

    store.show(Modal::NetworkError);
    assert_eq!(manager.phase(), store.phase());
    assert_eq!(manager.descriptor().generation(), store.snapshot().generation());
    assert_eq!(manager.render().as_deref(), Some("network error (exiting)"));
}

#[test]
fn test_needs_render_tracks_store_changes() {
    let store = OverlayStore::new();
    let manager = OverlayManager::new(&store, Recorder::default());
    manager.render();
    assert!(!manager.needs_render());

    store.show(Modal::NetworkError);
    assert!(manager.needs_render());
    manager.render();
    assert!(!manager.needs_render());
    assert_eq!(manager.render_count(), 1);
}

#[test]
fn test_overlay_closes_itself_through_context() {
    let store = OverlayStore::new();
    let registry = {
        let mut registry = OverlayRegistry::<Modal, bool>::new();
        for kind in [ModalKind::DeleteRule, ModalKind::DeletePolicy, ModalKind::NetworkError] {
            registry
                .register(kind, |_, ctx| {
                    // Confirm immediately, then finish the exit animation.
                    if ctx.is_visible() {
                        ctx.close()
                    } else {
                        ctx.exit_complete()
                    }
                })
                .unwrap();
        }
        registry
    };
    registry.verify().unwrap();
    let manager = OverlayManager::new(&store, registry);

    store.show(delete_rule("r9"));
    assert_eq!(manager.render(), Some(true));
    assert_eq!(store.phase(), OverlayPhase::Closing);
    assert_eq!(manager.render(), Some(true));
    assert_eq!(store.phase(), OverlayPhase::Closed);
}

#[test]
fn test_registry_reports_missing_and_duplicate_kinds() {
    let mut registry = OverlayRegistry::<Modal, ()>::new();
    registry.register(ModalKind::DeleteRule, |_, _| ()).unwrap();

    let err = registry
        .register(ModalKind::DeleteRule, |_, _| ())
        .unwrap_err();
    assert!(matches!(err, OverlayError::DuplicateRegistration { .. }));

    assert_eq!(
        registry.missing(),
        vec![ModalKind::DeletePolicy, ModalKind::NetworkError]
    );
    let err = registry.verify().unwrap_err();
    assert_eq!(
        err.to_string(),
        "no renderer registered for modal overlay kinds: DELETE_POLICY, NETWORK_ERROR"
    );
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "no renderer registered for modal overlay kind NETWORK_ERROR")]
fn test_unregistered_kind_fails_loudly_in_debug() {
    let store = OverlayStore::new();
    let manager = OverlayManager::new(&store, OverlayRegistry::<Modal, ()>::new());
    store.show(Modal::NetworkError);
    manager.render();
}

#[test]
#[cfg(not(debug_assertions))]
fn test_unregistered_kind_renders_nothing_in_release() {
    let store = OverlayStore::new();
    let registry = OverlayRegistry::<Modal, ()>::new();
    store.show(Modal::NetworkError);
    let ctx_render = OverlayManager::new(&store, registry).render();
    assert_eq!(ctx_render, None);
}

#[test]
fn test_registry_renders_registered_kind() {
    let store = OverlayStore::new();
    let mut registry = OverlayRegistry::<Modal, String>::new();
    registry
        .register(ModalKind::DeletePolicy, |overlay, _| match overlay {
            Modal::DeletePolicy { policy_id } => policy_id.clone(),
            other => panic!("unexpected overlay {other:?}"),
        })
        .unwrap();

    store.show(Modal::DeletePolicy {
        policy_id: "p1".into(),
    });
    let manager = OverlayManager::new(&store, registry);
    assert_eq!(manager.render().as_deref(), Some("p1"));
    assert!(manager.renderer().is_registered(ModalKind::DeletePolicy));
    assert!(!manager.renderer().is_registered(ModalKind::NetworkError));
}
