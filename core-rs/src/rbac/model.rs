//! Roles, modules and actions
//!
//! All three are closed sets. Wire names match what the dashboard backend
//! sends: snake_case roles, kebab-case modules, lowercase actions.

use crate::errors::AhcpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    SectionSupervisor,
    FieldWorker,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SectionSupervisor => "section_supervisor",
            Self::FieldWorker => "field_worker",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::SuperAdmin, Self::SectionSupervisor, Self::FieldWorker]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AhcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AhcpError::UnknownRole(s.to_string()))
    }
}

/// Application module that authorization scopes against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    ParasiteControl,
    Vaccination,
    MobileClinics,
    Laboratories,
    EquineHealth,
    Clients,
}

impl Module {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ParasiteControl => "parasite-control",
            Self::Vaccination => "vaccination",
            Self::MobileClinics => "mobile-clinics",
            Self::Laboratories => "laboratories",
            Self::EquineHealth => "equine-health",
            Self::Clients => "clients",
        }
    }

    /// Arabic label shown to dashboard users
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::ParasiteControl => "مكافحة الطفيليات",
            Self::Vaccination => "التطعيمات",
            Self::MobileClinics => "العيادات المتنقلة",
            Self::Laboratories => "المختبرات",
            Self::EquineHealth => "صحة الخيول",
            Self::Clients => "العملاء",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ParasiteControl,
            Self::Vaccination,
            Self::MobileClinics,
            Self::Laboratories,
            Self::EquineHealth,
            Self::Clients,
        ]
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = AhcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AhcpError::UnknownModule(s.to_string()))
    }
}

/// Operation a permission check is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Arabic verb used in denial notices
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::View => "عرض",
            Self::Create => "إضافة",
            Self::Edit => "تعديل",
            Self::Delete => "حذف",
        }
    }

    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::View)
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::View, Self::Create, Self::Edit, Self::Delete]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AhcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AhcpError::UnknownAction(s.to_string()))
    }
}

/// The `(module, action)` pair a UI element gates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub module: Module,
    pub action: Action,
}

impl PermissionRequest {
    pub const fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for PermissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.action)
    }
}
