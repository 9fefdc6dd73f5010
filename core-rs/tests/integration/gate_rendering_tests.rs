//! Integration tests for permission-gated rendering
//!
//! Drives the gates the way a listing page does: one snapshot per render,
//! buttons and forms evaluated against it.

use ahcp_core::gate::{
    action_button, admin_only_button, conditional, delete_buttons, permission_gate, role_gate,
    supervisor_only_button, ButtonState, DeleteSelected, GateOutcome,
};
use ahcp_core::rbac::{Action, DenialReason, Module, PermissionRequest, Permissions, Role};
use ahcp_core::{RecordingSink, SessionProvider, SessionStore};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    AddButton,
    EditForm,
    ReadOnlyNotice,
    AdminPanel,
}

#[test]
fn test_listing_page_for_vaccination_supervisor() {
    let store = SessionStore::default();
    store
        .login(Role::SectionSupervisor, Some("التطعيمات"), "vacc@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());

    // Own section: full toolbar
    let add = action_button(
        &perms,
        PermissionRequest::new(Module::Vaccination, Action::Create),
        Node::AddButton,
        false,
    );
    assert!(add.is_enabled());
    assert_eq!(delete_buttons(&perms, Module::Vaccination, 2).count(), 2);

    // Other section: read only
    let form = permission_gate(
        &perms,
        PermissionRequest::new(Module::Laboratories, Action::Edit),
        Node::EditForm,
        Some(Node::ReadOnlyNotice),
        None,
    );
    assert_eq!(form.clone().into_node(), Some(Node::ReadOnlyNotice));
    assert!(matches!(form, GateOutcome::Fallback { reason: DenialReason::OutsideSection { .. }, .. }));
    assert_eq!(delete_buttons(&perms, Module::Laboratories, 2).count(), 0);

    let admin_panel = role_gate(&perms, &[Role::SuperAdmin], Node::AdminPanel, None);
    assert!(admin_panel.into_node().is_none());
}

#[test]
fn test_noisy_button_reports_on_click_only() {
    let store = SessionStore::default();
    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());
    let sink = RecordingSink::new();

    let state = action_button(
        &perms,
        PermissionRequest::new(Module::Laboratories, Action::Delete),
        "حذف",
        true,
    );

    // Rendering alone does not notify
    assert!(sink.is_empty());

    let ButtonState::Blocked { blocked, .. } = state else {
        panic!("expected blocked button");
    };
    blocked.click(&perms, &sink);
    blocked.click(&perms, &sink);
    assert_eq!(sink.len(), 2);
}

#[test]
fn test_blocked_click_uses_identity_at_click_time() {
    let store = SessionStore::default();
    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();

    let rendered_with = store.current();
    let state = action_button(
        &Permissions::new(rendered_with.as_deref()),
        PermissionRequest::new(Module::MobileClinics, Action::Edit),
        (),
        true,
    );

    store.login(Role::SuperAdmin, None, "admin@ahcp.gov.sa").unwrap();
    let sink = RecordingSink::new();

    let ButtonState::Blocked { blocked, .. } = state else {
        panic!("expected blocked button");
    };
    let now = store.current();
    assert!(blocked.click(&Permissions::new(now.as_deref()), &sink));
    assert!(sink.is_empty());
}

#[test]
fn test_admin_only_click_by_section_supervisor() {
    let store = SessionStore::default();
    store
        .login(Role::SectionSupervisor, Some("التطعيمات"), "vacc@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());
    let sink = RecordingSink::new();

    let request = PermissionRequest::new(Module::Vaccination, Action::Delete);
    // The supervisor may delete here, but the button is reserved for admins
    assert!(perms.can_delete(Module::Vaccination));

    let ButtonState::Blocked { blocked, .. } = admin_only_button(&perms, request, "حذف الكل", true) else {
        panic!("expected blocked button");
    };
    assert!(!blocked.click(&perms, &sink));
    assert_eq!(sink.len(), 1);

    // Admin logs in before the next click
    store.login(Role::SuperAdmin, None, "admin@ahcp.gov.sa").unwrap();
    let now = store.current();
    assert!(blocked.click(&Permissions::new(now.as_deref()), &sink));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_gates_change_immediately_on_logout() {
    let store = SessionStore::default();
    store.login(Role::SuperAdmin, None, "admin@ahcp.gov.sa").unwrap();

    let render = |store: &SessionStore| {
        let snapshot = store.current();
        let perms = Permissions::new(snapshot.as_deref());
        (
            admin_only_button(
                &perms,
                PermissionRequest::new(Module::Laboratories, Action::Delete),
                (),
                false,
            )
            .is_visible(),
            delete_buttons(&perms, Module::Laboratories, 1).count(),
        )
    };

    assert_eq!(render(&store), (true, 2));
    store.logout();
    assert_eq!(render(&store), (false, 0));
}

#[test]
fn test_supervisor_only_button_for_each_role() {
    let store = SessionStore::default();

    store.login(Role::SuperAdmin, None, "admin@ahcp.gov.sa").unwrap();
    let snapshot = store.current();
    assert!(supervisor_only_button(&Permissions::new(snapshot.as_deref()), Module::EquineHealth, (), false).is_enabled());

    store
        .login(Role::SectionSupervisor, Some("صحة الخيول"), "horse@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    assert!(supervisor_only_button(&Permissions::new(snapshot.as_deref()), Module::EquineHealth, (), false).is_enabled());

    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();
    let snapshot = store.current();
    let state = supervisor_only_button(&Permissions::new(snapshot.as_deref()), Module::EquineHealth, (), true);
    assert!(state.is_visible() && !state.is_enabled());
}

#[test]
fn test_delete_selected_tracks_selection_count() {
    let store = SessionStore::default();
    store
        .login(Role::SectionSupervisor, Some("جميع الأقسام"), "all@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());

    let none_selected = delete_buttons(&perms, Module::ParasiteControl, 0);
    assert!(none_selected.delete_selected.is_none());
    assert!(none_selected.delete_all.is_some());

    let some_selected = delete_buttons(&perms, Module::ParasiteControl, 7);
    assert_eq!(
        some_selected.delete_selected,
        Some(DeleteSelected { module: Module::ParasiteControl, selected: 7 })
    );
}

#[test]
fn test_conditional_ignores_identity() {
    // Feature flag gate renders for anonymous users too
    let out = conditional(true, Node::EditForm, None);
    assert_eq!(out.into_node(), Some(Node::EditForm));
}
