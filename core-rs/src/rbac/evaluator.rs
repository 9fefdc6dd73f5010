//! Permission evaluator
//!
//! Pure decision over `(identity, module, action)`. Rules apply in this
//! order, first match wins:
//!
//! 1. no identity → deny
//! 2. `super_admin` → allow
//! 3. `clients` module → allow (client records are editable by everyone)
//! 4. role rules: supervisors view everything and mutate inside their
//!    section scope, field workers only view
//! 5. anything else → deny
//!
//! The identity is passed in; nothing here reads ambient state.

use crate::notice::{Notice, NoticeConfig, NoticeSink};
use crate::rbac::model::{Action, Module, PermissionRequest, Role};
use crate::rbac::section_map::SectionScope;
use crate::session::Identity;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// No identity in the session
    Unauthenticated,
    /// The role never grants this action
    Unauthorized {
        role: Role,
        module: Module,
        action: Action,
    },
    /// Supervisor mutating outside the section they supervise
    OutsideSection {
        module: Module,
        action: Action,
        scope: Option<SectionScope>,
    },
    /// Module or action outside the known sets
    UnknownRequest { module: String, action: String },
    /// Role not in a gate's allow-list
    RoleNotAllowed { role: Option<Role> },
    /// An external condition was false
    ConditionUnmet,
    /// Nothing selected
    EmptySelection,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("not logged in"),
            Self::Unauthorized { role, module, action } => {
                write!(f, "role {} may not {} in {}", role, action, module)
            }
            Self::OutsideSection { module, action, scope } => match scope {
                Some(scope) => write!(f, "{} in {} is outside section scope {}", action, module, scope),
                None => write!(f, "{} in {} denied: no section scope", action, module),
            },
            Self::UnknownRequest { module, action } => {
                write!(f, "unknown permission request {}.{}", module, action)
            }
            Self::RoleNotAllowed { role: Some(role) } => write!(f, "role {} not allowed", role),
            Self::RoleNotAllowed { role: None } => f.write_str("no role"),
            Self::ConditionUnmet => f.write_str("condition not met"),
            Self::EmptySelection => f.write_str("nothing selected"),
        }
    }
}

/// Inspectable outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn reason(&self) -> Option<&DenialReason> {
        match self {
            Decision::Allowed => None,
            Decision::Denied(reason) => Some(reason),
        }
    }
}

/// Evaluate a request and say why it was denied
pub fn evaluate(identity: Option<&Identity>, module: Module, action: Action) -> Decision {
    let Some(identity) = identity else {
        return Decision::Denied(DenialReason::Unauthenticated);
    };

    let role = identity.role();

    if role == Role::SuperAdmin {
        return Decision::Allowed;
    }

    // Client records are globally editable by any authenticated identity
    if module == Module::Clients {
        return Decision::Allowed;
    }

    match role {
        Role::SuperAdmin => Decision::Allowed,
        Role::SectionSupervisor => {
            if action == Action::View {
                return Decision::Allowed;
            }
            match identity.scope() {
                Some(scope) if scope.covers(module) => Decision::Allowed,
                scope => Decision::Denied(DenialReason::OutsideSection {
                    module,
                    action,
                    scope,
                }),
            }
        }
        Role::FieldWorker => {
            if action == Action::View {
                Decision::Allowed
            } else {
                Decision::Denied(DenialReason::Unauthorized {
                    role,
                    module,
                    action,
                })
            }
        }
    }
}

/// Whether `identity` may perform `action` on `module`
pub fn decide(identity: Option<&Identity>, module: Module, action: Action) -> bool {
    let decision = evaluate(identity, module, action);
    debug!(
        module = %module,
        action = %action,
        role = ?identity.map(Identity::role),
        allowed = decision.is_allowed(),
        "permission decision"
    );
    decision.is_allowed()
}

/// String entry point; unrecognised module or action names deny
pub fn evaluate_str(identity: Option<&Identity>, module: &str, action: &str) -> Decision {
    match (module.parse::<Module>(), action.parse::<Action>()) {
        (Ok(module), Ok(action)) => evaluate(identity, module, action),
        _ => {
            debug!(module, action, "unknown permission request denied");
            Decision::Denied(DenialReason::UnknownRequest {
                module: module.to_string(),
                action: action.to_string(),
            })
        }
    }
}

pub fn decide_str(identity: Option<&Identity>, module: &str, action: &str) -> bool {
    evaluate_str(identity, module, action).is_allowed()
}

/// Same decision as [`decide`], plus a notice on denied mutations
///
/// Exactly one notice is sent when the result is `false` and the action is
/// not `view`. Denied views stay silent.
pub fn decide_with_notice(
    identity: Option<&Identity>,
    module: Module,
    action: Action,
    sink: &dyn NoticeSink,
    config: &NoticeConfig,
) -> bool {
    let allowed = decide(identity, module, action);
    if !allowed && action.is_mutation() {
        sink.notify(Notice::permission_denied(module, action, config));
    }
    allowed
}

/// Module (or `all`) the identity supervises
pub fn resolve_user_module(identity: Option<&Identity>) -> Option<SectionScope> {
    identity.and_then(Identity::scope)
}

/// Permission queries bound to one identity snapshot
///
/// Build a fresh value for every render from the session's current
/// snapshot; it holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    identity: Option<&'a Identity>,
    notice: NoticeConfig,
}

impl<'a> Permissions<'a> {
    pub fn new(identity: Option<&'a Identity>) -> Self {
        Permissions {
            identity,
            notice: NoticeConfig::default(),
        }
    }

    pub fn with_notice_config(mut self, notice: NoticeConfig) -> Self {
        self.notice = notice;
        self
    }

    pub fn notice_config(&self) -> NoticeConfig {
        self.notice
    }

    pub fn identity(&self) -> Option<&'a Identity> {
        self.identity
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.map(Identity::role)
    }

    pub fn evaluate(&self, request: PermissionRequest) -> Decision {
        evaluate(self.identity, request.module, request.action)
    }

    pub fn check(&self, module: Module, action: Action) -> bool {
        decide(self.identity, module, action)
    }

    pub fn check_with_notice(&self, module: Module, action: Action, sink: &dyn NoticeSink) -> bool {
        decide_with_notice(self.identity, module, action, sink, &self.notice)
    }

    pub fn can_view(&self, module: Module) -> bool {
        self.check(module, Action::View)
    }

    pub fn can_create(&self, module: Module) -> bool {
        self.check(module, Action::Create)
    }

    pub fn can_edit(&self, module: Module) -> bool {
        self.check(module, Action::Edit)
    }

    pub fn can_delete(&self, module: Module) -> bool {
        self.check(module, Action::Delete)
    }

    pub fn can_edit_in_module(&self, module: Module) -> bool {
        self.can_edit(module)
    }

    pub fn user_module(&self) -> Option<SectionScope> {
        resolve_user_module(self.identity)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::SuperAdmin)
    }

    pub fn is_supervisor(&self) -> bool {
        self.role() == Some(Role::SectionSupervisor)
    }

    pub fn is_worker(&self) -> bool {
        self.role() == Some(Role::FieldWorker)
    }

    /// Modules the identity can view
    pub fn accessible_modules(&self) -> Vec<Module> {
        Module::all().iter().copied().filter(|m| self.can_view(*m)).collect()
    }

    /// Modules the identity can edit
    pub fn editable_modules(&self) -> Vec<Module> {
        Module::all().iter().copied().filter(|m| self.can_edit(*m)).collect()
    }
}
