//! Section label → module mapping
//!
//! Supervisors are assigned a human-readable section label. The label is
//! resolved here, once, when an identity is built; decisions only ever see
//! the resolved [`SectionScope`].
//!
//! A label maps to a module, to `all`, or is explicitly unmapped (`~` in
//! YAML). Unknown labels are not errors: they resolve to "no module".

use crate::errors::{AhcpError, Result};
use crate::rbac::model::Module;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Sentinel value meaning "every module"
pub const ALL_SECTIONS: &str = "all";

/// What a section label grants mutation rights over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SectionScope {
    All,
    Module(Module),
}

impl SectionScope {
    /// Whether this scope covers `module`
    pub fn covers(&self, module: Module) -> bool {
        match self {
            Self::All => true,
            Self::Module(m) => *m == module,
        }
    }
}

impl fmt::Display for SectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SECTIONS),
            Self::Module(m) => write!(f, "{}", m),
        }
    }
}

impl FromStr for SectionScope {
    type Err = AhcpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == ALL_SECTIONS {
            return Ok(Self::All);
        }
        s.parse::<Module>().map(Self::Module)
    }
}

impl TryFrom<String> for SectionScope {
    type Error = AhcpError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SectionScope> for String {
    fn from(scope: SectionScope) -> Self {
        scope.to_string()
    }
}

/// Built-in labels used by the dashboard
static DEFAULT_SECTIONS: Lazy<BTreeMap<String, Option<SectionScope>>> = Lazy::new(|| {
    let entries: [(&str, SectionScope); 7] = [
        ("مكافحة الطفيليات", SectionScope::Module(Module::ParasiteControl)),
        ("التطعيمات", SectionScope::Module(Module::Vaccination)),
        ("التحصينات", SectionScope::Module(Module::Vaccination)),
        ("العيادات المتنقلة", SectionScope::Module(Module::MobileClinics)),
        ("المختبرات", SectionScope::Module(Module::Laboratories)),
        ("صحة الخيول", SectionScope::Module(Module::EquineHealth)),
        ("جميع الأقسام", SectionScope::All),
    ];

    entries
        .into_iter()
        .map(|(label, scope)| (label.to_string(), Some(scope)))
        .collect()
});

/// Static label → scope table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionModuleMap {
    entries: BTreeMap<String, Option<SectionScope>>,
}

impl Default for SectionModuleMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_SECTIONS.clone(),
        }
    }
}

impl SectionModuleMap {
    /// Build a map from explicit entries. `None` marks a label as unmapped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<SectionScope>)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(l, s)| (l.into(), s)).collect(),
        }
    }

    /// Resolve a section label to its scope
    ///
    /// Unknown labels are logged and resolve to `None`, the same as an
    /// explicitly unmapped label.
    pub fn resolve(&self, label: &str) -> Option<SectionScope> {
        let key = label.trim();
        match self.entries.get(key) {
            Some(Some(scope)) => Some(*scope),
            Some(None) => {
                debug!(section = key, "section label is explicitly unmapped");
                None
            }
            None => {
                warn!(section = key, "section label not present in section map");
                None
            }
        }
    }

    /// Whether the label is present at all, mapped or not
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label.trim())
    }

    /// All labels resolving to `module`, in sorted order
    pub fn labels_for(&self, module: Module) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, scope)| **scope == Some(SectionScope::Module(module)))
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<SectionScope>)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the table before it is used for any decision
    ///
    /// Ensures:
    /// - no label is blank
    /// - no two labels collide after trimming surrounding whitespace
    ///
    /// Values are already typed, so unknown module names are rejected when
    /// the map is deserialized.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for label in self.entries.keys() {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                return Err(AhcpError::SectionMap(
                    "section label cannot be empty".to_string(),
                ));
            }

            if let Some(previous) = seen.insert(trimmed, label.as_str()) {
                return Err(AhcpError::SectionMap(format!(
                    "labels '{}' and '{}' differ only by surrounding whitespace",
                    previous, label
                )));
            }
        }

        Ok(())
    }
}
