//! # AHCP Core - dashboard authorization
//!
//! Permission decisions for the AHCP animal health case management
//! dashboard. Every protected page, form and button asks the same question:
//! may this identity perform this action on this module?
//!
//! ## Key Features
//!
//! - Closed role / module / action sets with their Arabic display names
//! - Section label → module table, validated at startup
//! - Pure evaluator over an explicit identity snapshot
//! - Tagged gate outcomes for conditional rendering
//! - Fire-and-forget denial notices
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   snapshot   ┌─────────────┐   Decision   ┌──────────────┐
//! │ SessionStore │ ───────────▶ │  evaluator  │ ───────────▶ │    gates     │
//! └──────────────┘              └─────────────┘              └──────────────┘
//!                                      │ denied mutation
//!                                      ▼
//!                               ┌─────────────┐
//!                               │ NoticeSink  │
//!                               └─────────────┘
//! ```

pub mod errors;
pub mod rbac;
pub mod session;
pub mod notice;
pub mod gate;
pub mod config;

pub use errors::AhcpError;
pub use rbac::{
    decide, decide_str, decide_with_notice, evaluate, resolve_user_module, Action, Decision,
    DenialReason, Module, PermissionRequest, Permissions, Role, SectionModuleMap, SectionScope,
};
pub use session::{validate_email, Identity, SessionId, SessionProvider, SessionStore};
pub use notice::{Notice, NoticeConfig, NoticeSink, RecordingSink, TracingSink};
pub use gate::{
    action_button, admin_only_button, conditional, delete_buttons, permission_gate, role_gate,
    supervisor_only_button, ButtonState, DeleteButtons, GateOutcome,
};
pub use config::AuthzConfig;

/// Version of the authorization rules
pub const VERSION: &str = "0.4.2";
