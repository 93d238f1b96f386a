//! Docket configuration
//!
//! One TOML document with a section per component. Every section and field
//! is optional; missing values fall back to defaults.
//!
//! ```toml
//! [registry]
//! number_ceiling = 99
//!
//! [detector]
//! require_prefix = true
//!
//! [logging]
//! filter = "docket=debug"
//! json = true
//! ```

use crate::error::DocketError;
use docket_ident::DetectorConfig;
use docket_registry::{RegistryConfig, MAX_EVENT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Docket configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocketConfig {
    /// Registry settings applied to every case
    pub registry: RegistryConfig,
    /// Filename detection settings
    pub detector: DetectorConfig,
    /// Logging settings
    pub logging: LogConfig,
}

impl DocketConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With registry settings
    #[inline]
    #[must_use]
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// With detector settings
    #[inline]
    #[must_use]
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// With logging settings
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`DocketError::ConfigParse`] on malformed TOML or wrong field types,
    /// [`DocketError::ConfigValue`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, DocketError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges the type system cannot express
    ///
    /// # Errors
    /// Returns [`DocketError::ConfigValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), DocketError> {
        let capacity = self.registry.event_capacity;
        if capacity == 0 || capacity > MAX_EVENT_CAPACITY {
            return Err(DocketError::ConfigValue(format!(
                "registry.event_capacity must be between 1 and {MAX_EVENT_CAPACITY}, got {capacity}"
            )));
        }
        Ok(())
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`DocketError::ConfigIo`] if the file cannot be read, or
    /// [`DocketError::ConfigParse`] if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocketError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns [`DocketError::ConfigSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, DocketError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogConfig {
    /// With filter directive
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// With JSON output
    #[inline]
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
