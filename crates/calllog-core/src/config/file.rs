//! YAML configuration file for the interceptor
//!
//! Default location is `<config dir>/calllog/config.yaml`
//! (`~/.config` on Linux, `~/Library/Application Support` on macOS).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::category::CategoryRegistry;
use crate::logging::{
    ConsoleLoggerFactory, LoggerFactory, NoOpLoggerFactory, TracingLoggerFactory,
};
use crate::types::{Category, CategorySet};

const DEFAULT_CONSOLE_PREFIX: &str = "[calllog]";

fn default_console_prefix() -> String {
    DEFAULT_CONSOLE_PREFIX.to_string()
}

/// Which logging backend records are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// `tracing` events; needs a subscriber installed by the host
    #[default]
    Tracing,
    /// stdout for info, stderr for warnings and errors
    Console,
    /// Discard everything
    Noop,
}

/// A watched type and its categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistration {
    /// Fully-qualified type name, as `std::any::type_name` reports it
    pub name: String,
    pub categories: Vec<Category>,
}

impl TypeRegistration {
    pub fn new(name: impl Into<String>, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            name: name.into(),
            categories: categories.into_iter().collect(),
        }
    }
}

/// Interceptor configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptorConfig {
    #[serde(default)]
    pub sink: SinkKind,

    /// Prefix for console lines
    #[serde(default = "default_console_prefix")]
    pub console_prefix: String,

    /// Watched types
    #[serde(default)]
    pub types: Vec<TypeRegistration>,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            console_prefix: default_console_prefix(),
            types: Vec::new(),
        }
    }
}

impl InterceptorConfig {
    /// Default config file path (`<config dir>/calllog/config.yaml`)
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        config_dir.join("calllog").join("config.yaml")
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: InterceptorConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Write to a file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject entries without a name or without categories
    pub fn validate(&self) -> ConfigResult<()> {
        for entry in &self.types {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid("type entry with empty name".to_string()));
            }
            if entry.categories.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "type {} has no categories",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Category registry holding every configured type
    pub fn registry(&self) -> CategoryRegistry {
        let mut registry = CategoryRegistry::new();
        for entry in &self.types {
            let categories: CategorySet = entry.categories.iter().copied().collect();
            registry.register_name(entry.name.clone(), categories);
        }
        registry
    }

    /// Logger factory for the configured sink
    pub fn logger_factory(&self) -> Arc<dyn LoggerFactory> {
        match self.sink {
            SinkKind::Tracing => Arc::new(TracingLoggerFactory),
            SinkKind::Console => {
                Arc::new(ConsoleLoggerFactory::with_prefix(self.console_prefix.clone()))
            }
            SinkKind::Noop => Arc::new(NoOpLoggerFactory),
        }
    }
}
