//! Permission-gated rendering
//!
//! Each gate is a stateless function of the current identity snapshot, a
//! request and any UI state the caller owns (selection count, feature
//! flags). Gates return a tagged outcome instead of "render nothing", so the
//! decision can be inspected without a rendering layer.
//!
//! `T` / `B` are whatever node or button type the rendering layer uses.
//!
//! # Example
//!
//! ```rust
//! use ahcp_core::gate::{delete_buttons, permission_gate};
//! use ahcp_core::rbac::{Action, Module, PermissionRequest, Permissions, Role, SectionModuleMap};
//! use ahcp_core::session::Identity;
//!
//! let map = SectionModuleMap::default();
//! let sup = Identity::resolve(Role::SectionSupervisor, Some("التطعيمات"), "s@ahcp.gov.sa", &map);
//! let perms = Permissions::new(Some(&sup));
//!
//! let edit_form = permission_gate(
//!     &perms,
//!     PermissionRequest::new(Module::Vaccination, Action::Edit),
//!     "edit-form",
//!     None,
//!     None,
//! );
//! assert!(edit_form.is_rendered());
//!
//! let buttons = delete_buttons(&perms, Module::Laboratories, 3);
//! assert_eq!(buttons.count(), 0);
//! ```

use crate::notice::{Notice, NoticeSink};
use crate::rbac::evaluator::{DenialReason, Decision, Permissions};
use crate::rbac::model::{Action, Module, PermissionRequest, Role};
use serde::Serialize;
use tracing::debug;

/// What a gate renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "render", rename_all = "snake_case")]
pub enum GateOutcome<T> {
    /// Children are rendered
    Render { node: T },
    /// Denied, the supplied fallback is rendered
    Fallback { node: T, reason: DenialReason },
    /// Denied, nothing is rendered
    Nothing { reason: DenialReason },
}

impl<T> GateOutcome<T> {
    fn from_decision(decision: Decision, children: T, fallback: Option<T>) -> Self {
        match decision {
            Decision::Allowed => GateOutcome::Render { node: children },
            Decision::Denied(reason) => match fallback {
                Some(node) => GateOutcome::Fallback { node, reason },
                None => GateOutcome::Nothing { reason },
            },
        }
    }

    /// Whether the gated children themselves are rendered
    pub fn is_rendered(&self) -> bool {
        matches!(self, GateOutcome::Render { .. })
    }

    pub fn reason(&self) -> Option<&DenialReason> {
        match self {
            GateOutcome::Render { .. } => None,
            GateOutcome::Fallback { reason, .. } | GateOutcome::Nothing { reason } => Some(reason),
        }
    }

    /// Node to hand to the rendering layer, children or fallback
    pub fn into_node(self) -> Option<T> {
        match self {
            GateOutcome::Render { node } | GateOutcome::Fallback { node, .. } => Some(node),
            GateOutcome::Nothing { .. } => None,
        }
    }
}

/// Render `children` only when the request is allowed
///
/// With `notify` set, the noisy decision path is used and a denied mutation
/// produces a notice.
pub fn permission_gate<T>(
    perms: &Permissions<'_>,
    request: PermissionRequest,
    children: T,
    fallback: Option<T>,
    notify: Option<&dyn NoticeSink>,
) -> GateOutcome<T> {
    if let Some(sink) = notify {
        perms.check_with_notice(request.module, request.action, sink);
    }
    GateOutcome::from_decision(perms.evaluate(request), children, fallback)
}

/// Render `children` when an externally computed condition holds
pub fn conditional<T>(condition: bool, children: T, fallback: Option<T>) -> GateOutcome<T> {
    let decision = if condition {
        Decision::Allowed
    } else {
        Decision::Denied(DenialReason::ConditionUnmet)
    };
    GateOutcome::from_decision(decision, children, fallback)
}

/// Render `children` when the identity's role is in `allowed_roles`
pub fn role_gate<T>(
    perms: &Permissions<'_>,
    allowed_roles: &[Role],
    children: T,
    fallback: Option<T>,
) -> GateOutcome<T> {
    let decision = match perms.role() {
        Some(role) if allowed_roles.contains(&role) => Decision::Allowed,
        None => Decision::Denied(DenialReason::Unauthenticated),
        role => Decision::Denied(DenialReason::RoleNotAllowed { role }),
    };
    GateOutcome::from_decision(decision, children, fallback)
}

/// State of a permission-gated button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ButtonState<B> {
    /// Clickable
    Enabled { button: B },
    /// Not rendered at all
    Hidden { reason: DenialReason },
    /// Rendered disabled; clicking raises a notice
    Blocked { button: B, blocked: BlockedClick },
}

impl<B> ButtonState<B> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ButtonState::Enabled { .. })
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, ButtonState::Hidden { .. })
    }

    pub fn button(&self) -> Option<&B> {
        match self {
            ButtonState::Enabled { button } | ButtonState::Blocked { button, .. } => Some(button),
            ButtonState::Hidden { .. } => None,
        }
    }
}

/// Predicate a blocked button was gated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedCheck {
    /// The request itself, through the evaluator
    Request,
    /// Super admin role, whatever the request
    AdminOnly,
}

/// Click handler attached to a blocked button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockedClick {
    pub request: PermissionRequest,
    pub check: BlockedCheck,
}

impl BlockedClick {
    /// Re-run the gate's check on click, emitting a notice on denial
    ///
    /// Evaluated against the identity current at click time, so a login
    /// between render and click is honoured. A denied mutation yields
    /// exactly one notice naming `request`.
    pub fn click(&self, perms: &Permissions<'_>, sink: &dyn NoticeSink) -> bool {
        match self.check {
            BlockedCheck::Request => {
                perms.check_with_notice(self.request.module, self.request.action, sink)
            }
            BlockedCheck::AdminOnly => {
                if perms.is_admin() {
                    return true;
                }
                debug!(role = ?perms.role(), request = %self.request, "admin-only click denied");
                if self.request.action.is_mutation() {
                    sink.notify(Notice::permission_denied(
                        self.request.module,
                        self.request.action,
                        &perms.notice_config(),
                    ));
                }
                false
            }
        }
    }
}

fn gate_button<B>(
    decision: Decision,
    blocked: BlockedClick,
    button: B,
    show_toast: bool,
) -> ButtonState<B> {
    match decision {
        Decision::Allowed => ButtonState::Enabled { button },
        Decision::Denied(_) if show_toast => ButtonState::Blocked { button, blocked },
        Decision::Denied(reason) => ButtonState::Hidden { reason },
    }
}

/// Button gated on a permission request
///
/// `show_toast = false` hides the button on denial; `true` keeps it visible
/// but blocked, with a notice on click.
pub fn action_button<B>(
    perms: &Permissions<'_>,
    request: PermissionRequest,
    button: B,
    show_toast: bool,
) -> ButtonState<B> {
    let blocked = BlockedClick {
        request,
        check: BlockedCheck::Request,
    };
    gate_button(perms.evaluate(request), blocked, button, show_toast)
}

/// Button only a super admin can use
///
/// A blocked click re-checks the role, not `request`; `request` is the
/// operation the button would have performed and is named in the notice.
pub fn admin_only_button<B>(
    perms: &Permissions<'_>,
    request: PermissionRequest,
    button: B,
    show_toast: bool,
) -> ButtonState<B> {
    let decision = if perms.is_admin() {
        Decision::Allowed
    } else if perms.role().is_none() {
        Decision::Denied(DenialReason::Unauthenticated)
    } else {
        Decision::Denied(DenialReason::RoleNotAllowed { role: perms.role() })
    };
    let blocked = BlockedClick {
        request,
        check: BlockedCheck::AdminOnly,
    };
    gate_button(decision, blocked, button, show_toast)
}

/// Button for admins or supervisors who can edit `module`
pub fn supervisor_only_button<B>(
    perms: &Permissions<'_>,
    module: Module,
    button: B,
    show_toast: bool,
) -> ButtonState<B> {
    let request = PermissionRequest::new(module, Action::Edit);
    let decision = if perms.is_admin() || perms.can_edit_in_module(module) {
        Decision::Allowed
    } else {
        perms.evaluate(request)
    };
    let blocked = BlockedClick {
        request,
        check: BlockedCheck::Request,
    };
    gate_button(decision, blocked, button, show_toast)
}

/// "Delete selected" slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteSelected {
    pub module: Module,
    pub selected: usize,
}

/// "Delete all" slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteAll {
    pub module: Module,
}

/// Zero, one or two destructive buttons for a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteButtons {
    pub delete_selected: Option<DeleteSelected>,
    pub delete_all: Option<DeleteAll>,
}

impl DeleteButtons {
    /// Number of buttons to render
    pub fn count(&self) -> usize {
        usize::from(self.delete_selected.is_some()) + usize::from(self.delete_all.is_some())
    }
}

/// Delete buttons for `module`
///
/// Each slot checks `delete` on its own and is left out entirely when
/// denied. "Delete selected" is also left out when nothing is selected.
pub fn delete_buttons(perms: &Permissions<'_>, module: Module, selected_count: usize) -> DeleteButtons {
    let delete_selected = (selected_count > 0 && perms.can_delete(module)).then_some(DeleteSelected {
        module,
        selected: selected_count,
    });
    let delete_all = perms.can_delete(module).then_some(DeleteAll { module });

    DeleteButtons {
        delete_selected,
        delete_all,
    }
}

/// Why "delete selected" is not shown, if it is not
pub fn delete_selected_reason(
    perms: &Permissions<'_>,
    module: Module,
    selected_count: usize,
) -> Option<DenialReason> {
    match perms.evaluate(PermissionRequest::new(module, Action::Delete)) {
        Decision::Denied(reason) => Some(reason),
        Decision::Allowed if selected_count == 0 => Some(DenialReason::EmptySelection),
        Decision::Allowed => None,
    }
}
