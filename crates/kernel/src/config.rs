//! Serializer configuration.
//!
//! Built once at process start and shared read-only across requests. Every
//! key is optional in YAML; missing keys keep the built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::services::ImageVariantTable;

/// Serializer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Prefix for site-relative rendition URLs (default: http://127.0.0.1:8000).
    pub base_url: String,

    /// URL of the inert no-op link (default: "#").
    pub link_placeholder: String,

    /// Responsive image rendition table.
    pub images: ImageVariantTable,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            link_placeholder: "#".to_string(),
            images: ImageVariantTable::default(),
        }
    }
}

impl SerializerConfig {
    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
