// Notice Contract Tests
//
// The noisy decision path must notify exactly once per denied mutation
// and never otherwise.

use ahcp_core::rbac::{decide, decide_with_notice, Action, Module, Role, SectionModuleMap};
use ahcp_core::{Identity, NoticeConfig, RecordingSink};

fn user(role: Role, section: Option<&str>) -> Identity {
    Identity::resolve(role, section, "notice@ahcp.gov.sa", &SectionModuleMap::default())
}

/// WHY: One notice per denied mutation, none for allowed calls or views
/// BREAKS: Toast spam or silent failures on blocked buttons
#[test]
fn notice_emitted_iff_denied_mutation() {
    let identities = [
        None,
        Some(user(Role::SuperAdmin, None)),
        Some(user(Role::SectionSupervisor, Some("التطعيمات"))),
        Some(user(Role::SectionSupervisor, None)),
        Some(user(Role::FieldWorker, None)),
    ];
    let config = NoticeConfig::default();

    for identity in &identities {
        for module in Module::all() {
            for action in Action::all() {
                let sink = RecordingSink::new();
                let allowed = decide_with_notice(identity.as_ref(), *module, *action, &sink, &config);

                assert_eq!(allowed, decide(identity.as_ref(), *module, *action));

                let expected = usize::from(!allowed && action.is_mutation());
                assert_eq!(
                    sink.len(),
                    expected,
                    "{:?} {} {}",
                    identity.as_ref().map(Identity::role),
                    module,
                    action
                );
            }
        }
    }
}

/// WHY: Notice names the attempted action and module in Arabic
#[test]
fn notice_names_action_and_module() {
    let worker = user(Role::FieldWorker, None);
    let sink = RecordingSink::new();
    decide_with_notice(
        Some(&worker),
        Module::EquineHealth,
        Action::Edit,
        &sink,
        &NoticeConfig { duration_ms: 5000 },
    );

    let notices = sink.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains(Action::Edit.display_name()));
    assert!(notices[0].message.contains(Module::EquineHealth.display_name()));
    assert_eq!(notices[0].duration_ms, 5000);
    assert!(!notices[0].description.is_empty());
}
