//! Integration tests for session lifecycle
//!
//! Tests that decisions follow the session snapshot across:
//! - Login
//! - Re-login as another user
//! - Logout
//! - Config-driven section tables

use ahcp_core::config::CONFIG_FILE_NAME;
use ahcp_core::rbac::{Action, Module, Permissions, Role, SectionScope};
use ahcp_core::{AuthzConfig, SessionProvider, SessionStore};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_decisions_follow_login_and_logout() {
    let store = SessionStore::default();

    // 1. Logged out: nothing renders
    {
        let snapshot = store.current();
        let perms = Permissions::new(snapshot.as_deref());
        assert!(!perms.can_view(Module::Vaccination));
    }

    // 2. Supervisor logs in
    store
        .login(Role::SectionSupervisor, Some("التطعيمات"), "vacc@ahcp.gov.sa")
        .unwrap();
    {
        let snapshot = store.current();
        let perms = Permissions::new(snapshot.as_deref());
        assert!(perms.can_edit(Module::Vaccination));
        assert!(!perms.can_edit(Module::Laboratories));
    }

    // 3. Field worker replaces the supervisor
    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();
    {
        let snapshot = store.current();
        let perms = Permissions::new(snapshot.as_deref());
        assert!(perms.is_worker());
        assert!(!perms.can_edit(Module::Vaccination));
        assert!(perms.can_edit(Module::Clients));
    }

    // 4. Logout: immediately denied again
    store.logout();
    let snapshot = store.current();
    assert!(!Permissions::new(snapshot.as_deref()).can_view(Module::Clients));
}

#[test]
fn test_snapshot_taken_before_login_is_unchanged() {
    let store = SessionStore::default();
    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();

    let before = store.current().unwrap();
    store.login(Role::SuperAdmin, None, "admin@ahcp.gov.sa").unwrap();

    // A render that started earlier keeps a consistent view
    assert_eq!(before.role(), Role::FieldWorker);
    assert!(!Permissions::new(Some(before.as_ref())).can_delete(Module::Laboratories));
    assert!(Permissions::new(store.current().as_deref()).can_delete(Module::Laboratories));
}

#[test]
fn test_readers_never_see_mixed_identity() {
    let store = Arc::new(SessionStore::default());
    store
        .login(Role::SectionSupervisor, Some("المختبرات"), "lab@ahcp.gov.sa")
        .unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..200 {
                if i % 2 == 0 {
                    store.login(Role::FieldWorker, None, "field@ahcp.gov.sa").unwrap();
                } else {
                    store
                        .login(Role::SectionSupervisor, Some("المختبرات"), "lab@ahcp.gov.sa")
                        .unwrap();
                }
            }
        })
    };

    for _ in 0..200 {
        if let Some(identity) = store.current() {
            match identity.role() {
                Role::FieldWorker => {
                    assert_eq!(identity.email(), "field@ahcp.gov.sa");
                    assert_eq!(identity.scope(), None);
                }
                Role::SectionSupervisor => {
                    assert_eq!(identity.email(), "lab@ahcp.gov.sa");
                    assert_eq!(identity.scope(), Some(SectionScope::Module(Module::Laboratories)));
                }
                Role::SuperAdmin => panic!("no admin was ever logged in"),
            }
        }
    }

    writer.join().unwrap();
}

#[test]
fn test_config_section_table_drives_resolution() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"
apiVersion: ahcp/v1
kind: AuthzConfig
metadata:
  name: regional-office
spec:
  sections:
    "قسم الخيل": equine-health
    "الإدارة العامة": ~
"#,
    )
    .unwrap();

    let config = AuthzConfig::load_from_dir(temp_dir.path()).unwrap();
    let store = SessionStore::new(config.section_map()).unwrap();

    store
        .login(Role::SectionSupervisor, Some("قسم الخيل"), "horse@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());
    assert!(perms.can_delete(Module::EquineHealth));

    // Built-in labels are not present in this table
    store
        .login(Role::SectionSupervisor, Some("صحة الخيول"), "horse@ahcp.gov.sa")
        .unwrap();
    let snapshot = store.current();
    let perms = Permissions::new(snapshot.as_deref());
    assert!(!perms.can_delete(Module::EquineHealth));
    assert!(perms.check(Module::EquineHealth, Action::View));

    // Explicitly unmapped label
    store
        .login(Role::SectionSupervisor, Some("الإدارة العامة"), "hq@ahcp.gov.sa")
        .unwrap();
    assert_eq!(store.current().unwrap().scope(), None);
}
