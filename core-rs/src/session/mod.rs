//! Identity and session snapshot
//!
//! The session collaborator owns the current [`Identity`]. It is replaced
//! wholesale on login and cleared on logout; readers take an `Arc` snapshot
//! and never observe a half-applied update.
//!
//! Section labels are resolved to a [`SectionScope`] here, once, so the
//! evaluator never compares strings.
//!
//! # Example
//!
//! ```rust
//! use ahcp_core::rbac::{Module, Role};
//! use ahcp_core::session::{SessionProvider, SessionStore};
//!
//! let store = SessionStore::default();
//! store.login(Role::SectionSupervisor, Some("التطعيمات"), "vet@ahcp.gov.sa").unwrap();
//!
//! let identity = store.current().unwrap();
//! assert!(identity.scope().unwrap().covers(Module::Vaccination));
//!
//! store.logout();
//! assert!(store.current().is_none());
//! ```

use crate::errors::{AhcpError, Result};
use crate::rbac::model::Role;
use crate::rbac::section_map::{SectionModuleMap, SectionScope};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Check that `email` looks like an address
///
/// Applied where users log in; an [`Identity`] handed over by another
/// session provider is taken as is.
pub fn validate_email(email: &str) -> Result<()> {
    let pattern = Regex::new(EMAIL_PATTERN)?;
    if !pattern.is_match(email.trim()) {
        return Err(AhcpError::InvalidIdentity(format!(
            "invalid email address: '{}'",
            email.trim()
        )));
    }
    Ok(())
}

/// Authenticated user for the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    role: Role,
    section: Option<String>,
    email: String,
    scope: Option<SectionScope>,
}

impl Identity {
    /// Build an identity, resolving its section label against `map`
    ///
    /// An unmapped section is not an error; it resolves to no scope.
    pub fn resolve(role: Role, section: Option<&str>, email: &str, map: &SectionModuleMap) -> Self {
        let email = email.trim();
        let section = section
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let scope = section.as_deref().and_then(|label| map.resolve(label));

        if role == Role::SectionSupervisor && scope.is_none() {
            warn!(
                email,
                section = section.as_deref().unwrap_or("<none>"),
                "section supervisor has no resolvable section; mutations will be denied"
            );
        }

        Identity {
            role,
            section,
            email: email.to_string(),
            scope,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Raw section label as assigned to the user
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Module (or `all`) this identity supervises
    pub fn scope(&self) -> Option<SectionScope> {
        self.scope
    }
}

/// Correlation id handed out on login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read side of the session collaborator
pub trait SessionProvider {
    /// Most recently committed identity, or `None` when logged out
    fn current(&self) -> Option<Arc<Identity>>;
}

#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    identity: Arc<Identity>,
}

/// In-process session holder with atomic-replace semantics
#[derive(Debug)]
pub struct SessionStore {
    map: SectionModuleMap,
    active: RwLock<Option<ActiveSession>>,
}

impl Default for SessionStore {
    /// Store over the built-in section table
    fn default() -> Self {
        SessionStore {
            map: SectionModuleMap::default(),
            active: RwLock::new(None),
        }
    }
}

impl SessionStore {
    /// Store over `map`, which is validated first
    ///
    /// # Errors
    /// Returns `SectionMap` if the table has blank or colliding labels.
    pub fn new(map: SectionModuleMap) -> Result<Self> {
        map.validate()?;
        Ok(SessionStore {
            map,
            active: RwLock::new(None),
        })
    }

    pub fn section_map(&self) -> &SectionModuleMap {
        &self.map
    }

    /// Replace the current identity with a freshly resolved one
    ///
    /// # Errors
    /// Returns `InvalidIdentity` if the email is not a plausible address;
    /// the previous identity stays in place.
    pub fn login(&self, role: Role, section: Option<&str>, email: &str) -> Result<SessionId> {
        validate_email(email)?;
        let identity = Identity::resolve(role, section, email, &self.map);
        Ok(self.replace(identity))
    }

    /// Install an already-built identity
    pub fn replace(&self, identity: Identity) -> SessionId {
        let id = SessionId::new();
        info!(
            session = %id,
            role = %identity.role(),
            email = identity.email(),
            scope = ?identity.scope(),
            "session started"
        );

        let session = ActiveSession {
            id,
            identity: Arc::new(identity),
        };

        let mut guard = self.active.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session);
        id
    }

    /// Clear the current identity. Returns the id of the ended session, if any.
    pub fn logout(&self) -> Option<SessionId> {
        let mut guard = self.active.write().unwrap_or_else(|e| e.into_inner());
        let ended = guard.take();

        if let Some(ref session) = ended {
            info!(
                session = %session.id,
                email = session.identity.email(),
                "session ended"
            );
        }

        ended.map(|s| s.id)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        let guard = self.active.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|s| s.id)
    }
}

impl SessionProvider for SessionStore {
    fn current(&self) -> Option<Arc<Identity>> {
        let guard = self.active.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|s| Arc::clone(&s.identity))
    }
}
