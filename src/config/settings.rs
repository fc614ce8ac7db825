//! View settings that can be saved and reapplied to any record set
//!
//! A view configuration bundles the filter thresholds and the visual mapping
//! so a reviewed view can be reproduced later or on a newer export.
//!
//! # Main Types
//!
//! - [`ViewConfig`] - Filter + mapping + display name
//! - [`ConfigFormat`] - On-disk format, chosen from the file extension
//!
//! # Domains
//!
//! With `auto_domain` set (the default), the gradient and width domains are
//! re-derived from the filtered statistics each time the view is applied and
//! the domains stored in `mapping` are ignored. Clear it to pin the domains.

use crate::error::{HierScopeError, Result};
use crate::pipeline::FilterConfig;
use crate::style::MappingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current view configuration format version
pub const VIEW_CONFIG_VERSION: u32 = 1;

/// Serialization format for view configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConfigFormat {
    /// JSON (default for unknown extensions)
    #[default]
    Json,
    /// TOML, for `.toml` files
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            ConfigFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// Saved view: filter thresholds plus visual mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Version for future migration support
    #[serde(default = "default_view_config_version")]
    pub version: u32,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Re-derive domains from filtered stats when applied
    #[serde(default = "default_true")]
    pub auto_domain: bool,

    /// Record filter
    #[serde(default)]
    pub filter: FilterConfig,

    /// Visual mapping
    #[serde(default)]
    pub mapping: MappingConfig,
}

fn default_view_config_version() -> u32 {
    VIEW_CONFIG_VERSION
}

fn default_true() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            version: VIEW_CONFIG_VERSION,
            name: "Untitled View".to_string(),
            auto_domain: true,
            filter: FilterConfig::default(),
            mapping: MappingConfig::default(),
        }
    }
}

impl ViewConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_mapping(mut self, mapping: MappingConfig) -> Self {
        self.mapping = mapping;
        self
    }

    /// Keep the domains stored in `mapping` instead of deriving them
    pub fn with_fixed_domain(mut self) -> Self {
        self.auto_domain = false;
        self
    }

    /// Parse from text in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| HierScopeError::Config(format!("Invalid JSON view config: {}", e)))?,
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| HierScopeError::Config(format!("Invalid TOML view config: {}", e)))?,
        };
        if config.version > VIEW_CONFIG_VERSION {
            tracing::warn!(
                "View config version {} is newer than supported version {}",
                config.version,
                VIEW_CONFIG_VERSION
            );
        }
        Ok(config)
    }

    /// Serialize to text in the given format
    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                HierScopeError::Config(format!("Failed to serialize view config: {}", e))
            }),
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                HierScopeError::Config(format!("Failed to serialize view config: {}", e))
            }),
        }
    }

    /// Load a view configuration; the format follows the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HierScopeError::Config(format!("Failed to read view config {:?}: {}", path, e))
        })?;
        let config = Self::parse(&content, ConfigFormat::from_path(path))
            .map_err(|e| e.with_context(format!("{:?}", path)))?;
        tracing::info!("Loaded view config '{}' from {:?}", config.name, path);
        Ok(config)
    }

    /// Save a view configuration; the format follows the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                HierScopeError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = self.to_string_as(ConfigFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|e| {
            HierScopeError::Config(format!("Failed to write view config {:?}: {}", path, e))
        })
    }
}
