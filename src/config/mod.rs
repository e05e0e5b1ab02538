//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::{DEFAULT_ORDER_BY, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Sort-key mapping entry as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKeyConfig {
    /// Storage fields the key sorts by, in order
    pub fields: Vec<String>,

    /// Invert the requested direction
    #[serde(default)]
    pub revert: bool,
}

/// Configuration for query handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Largest page a client can request
    pub max_page_size: usize,

    /// Page size used when the client does not ask for one
    pub default_page_size: usize,

    /// Sort expression used when the client does not ask for one
    pub default_order_by: String,

    /// Optional sort-key mappings (resource name -> public key -> entry)
    pub mappings: HashMap<String, HashMap<String, SortKeyConfig>>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            default_order_by: DEFAULT_ORDER_BY.to_string(),
            mappings: HashMap::new(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check limits for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue {
                field: "default_page_size".to_string(),
                value: self.default_page_size.to_string(),
                message: format!("must be between 1 and {}", self.max_page_size),
            });
        }

        Ok(())
    }

    /// Sort-key mappings configured for a resource, if any
    pub fn mapping_for(&self, resource_name: &str) -> Option<&HashMap<String, SortKeyConfig>> {
        self.mappings.get(resource_name)
    }
}
