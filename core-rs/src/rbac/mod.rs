//! RBAC (Role-Based Access Control) module
//!
//! Provides the role/module/action model, the section → module table and
//! the permission evaluator for the AHCP dashboard.

pub mod evaluator;
pub mod model;
pub mod section_map;

pub use evaluator::{
    decide, decide_str, decide_with_notice, evaluate, evaluate_str, resolve_user_module, Decision,
    DenialReason, Permissions,
};
pub use model::{Action, Module, PermissionRequest, Role};
pub use section_map::{SectionModuleMap, SectionScope, ALL_SECTIONS};
