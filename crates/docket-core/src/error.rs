//! Error types for Docket Core
//!
//! Provides the top-level error for:
//! - registry failures (duplicates, bad input, exhausted numbering)
//! - malformed citation references
//! - configuration loading
//! - logging setup

use docket_citation::ReferenceError;
use docket_registry::{CaseId, RegistryError};

/// Main Docket error type
#[derive(Debug, thiserror::Error)]
pub enum DocketError {
    /// Registry operation failed
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Citation reference could not be parsed
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Case is not open in the directory
    #[error("case not open: {0}")]
    CaseNotFound(CaseId),

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`crate::DocketConfig`]
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds an out-of-range value
    #[error("invalid configuration value: {0}")]
    ConfigValue(String),

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Logging could not be initialised
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl DocketError {
    /// Check if the error comes from user input and should be shown as a
    /// validation message rather than reported as a fault
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Registry(e) => e.is_validation(),
            Self::Reference(_) => true,
            _ => false,
        }
    }
}
