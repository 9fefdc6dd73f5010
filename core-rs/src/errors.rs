//! Error types for AHCP Core
//!
//! Permission denials are not errors; they come back as `bool` or
//! [`crate::rbac::Decision`]. This enum covers configuration, identity
//! construction and parsing failures only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AhcpError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Section map error: {0}")]
    SectionMap(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Regex error: {0}")]
    RegexError(String),
}

impl From<regex::Error> for AhcpError {
    fn from(err: regex::Error) -> Self {
        AhcpError::RegexError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AhcpError>;
