use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::types::{OptionDefinition, OptionFile};
use crate::options::{
    InvalidPolicy, MethodTable, OptionConfig, OptionError, OptionRegistry, OptionValue,
};

/// Errors that can occur when loading option definitions.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read option file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse option file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Option file validation failed: {message}")]
    ValidationError { message: String },

    #[error("Option registration failed")]
    Registration(#[from] OptionError),
}

impl OptionFile {
    /// Loads and validates option definitions from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses and validates TOML content; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: OptionFile = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.validate()?;
        Ok(file)
    }

    /// Validates the definitions.
    ///
    /// Checks:
    /// - Names are non-empty and unique
    /// - `invalid` is "raise" or "default"
    /// - Defaults are representable as option values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for def in &self.options {
            if def.name.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "Option names must not be empty".to_string(),
                });
            }
            if !seen.insert(def.name.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("Option '{}' is defined more than once", def.name),
                });
            }
            def.to_config()?;
        }
        Ok(())
    }

    /// Build a registry, resolving method names against `methods`.
    pub fn build_registry(&self, methods: MethodTable) -> Result<Arc<OptionRegistry>, ConfigError> {
        let mut builder = OptionRegistry::builder().methods(methods);
        for def in &self.options {
            builder = builder.define(def.name.clone(), def.to_config()?);
        }
        Ok(Arc::new(builder.build()?))
    }
}

impl OptionDefinition {
    /// Translate into the typed option configuration.
    pub fn to_config(&self) -> Result<OptionConfig, ConfigError> {
        let invalid =
            InvalidPolicy::parse(&self.invalid).ok_or_else(|| ConfigError::ValidationError {
                message: format!(
                    "Option '{}': invalid must be \"raise\" or \"default\", got \"{}\"",
                    self.name, self.invalid
                ),
            })?;

        let mut config = OptionConfig::new()
            .invalid(invalid)
            .incremental(self.incremental)
            .allow_callable(self.allow_block);

        if let Some(default) = &self.default {
            let value = OptionValue::try_from(default.clone()).map_err(|e| {
                ConfigError::ValidationError {
                    message: format!("Option '{}': {}", self.name, e),
                }
            })?;
            config = config.default_value(value);
        }
        if let Some(method) = &self.validate {
            config = config.validate_named(method.clone());
        }
        if let Some(method) = &self.filter {
            config = config.filter_named(method.clone());
        }
        if let Some(method) = &self.transform {
            config = config.transform_named(method.clone());
        }
        Ok(config)
    }
}
