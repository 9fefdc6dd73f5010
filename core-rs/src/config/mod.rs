/*
 * config
 * Parser for ahcp-authz.yaml (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: ahcp/v1
 * kind: AuthzConfig
 * metadata:
 *   name: ahcp-dashboard
 * spec:
 *   sections:
 *     "التطعيمات": vaccination
 *     "جميع الأقسام": all
 *     "الإدارة العامة": ~
 *   notice:
 *     durationMs: 4000
 * ```
 *
 * `spec.sections` replaces the built-in section table when present.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::AhcpError;
use crate::notice::NoticeConfig;
use crate::rbac::SectionModuleMap;

/// Config file name looked up by `load_from_dir`
pub const CONFIG_FILE_NAME: &str = "ahcp-authz.yaml";

const API_VERSION: &str = "ahcp/v1";
const KIND: &str = "AuthzConfig";

/// ahcp-authz.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthzConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: Spec,
}

/// Config metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
}

/// Authorization settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Spec {
    /// Section label table; built-in table when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionModuleMap>,
    #[serde(default)]
    pub notice: NoticeConfig,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        AuthzConfig::new("ahcp-dashboard".to_string())
    }
}

impl AuthzConfig {
    /// Load ahcp-authz.yaml from specified path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AhcpError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AhcpError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;

        let config: AuthzConfig = serde_yaml::from_str(&content)?;

        config.validate()?;

        debug!(
            path = %path.display(),
            sections = config.section_map().len(),
            "loaded authorization config"
        );

        Ok(config)
    }

    /// Load ahcp-authz.yaml from a directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, AhcpError> {
        Self::load(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Validate structure and the section table
    pub fn validate(&self) -> Result<(), AhcpError> {
        if self.api_version != API_VERSION {
            return Err(AhcpError::ValidationError(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != KIND {
            return Err(AhcpError::ValidationError(format!(
                "Invalid kind: expected '{}', got '{}'",
                KIND, self.kind
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(AhcpError::ValidationError(
                "metadata.name cannot be empty".to_string(),
            ));
        }

        if self.spec.notice.duration_ms == 0 {
            return Err(AhcpError::ValidationError(
                "spec.notice.durationMs must be greater than zero".to_string(),
            ));
        }

        if let Some(ref sections) = self.spec.sections {
            if sections.is_empty() {
                return Err(AhcpError::ValidationError(
                    "spec.sections cannot be empty; omit it to use the built-in table".to_string(),
                ));
            }
            sections.validate()?;
        }

        Ok(())
    }

    /// Save ahcp-authz.yaml to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AhcpError> {
        let yaml = serde_yaml::to_string(self)?;

        fs::write(path.as_ref(), yaml)?;

        Ok(())
    }

    pub fn new(name: String) -> Self {
        AuthzConfig {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata { name },
            spec: Spec::default(),
        }
    }

    /// Effective section table
    pub fn section_map(&self) -> SectionModuleMap {
        self.spec.sections.clone().unwrap_or_default()
    }

    pub fn notice(&self) -> NoticeConfig {
        self.spec.notice
    }
}
