//! Configuration System
//!
//! Layered configuration for a snapshot run: built-in defaults, an optional
//! TOML file, `DIRSNAP_*` environment variables, then CLI overrides.
//!
//! ```toml
//! [source]
//! source_dir = "website"
//! exclude = "\\.tmp$"
//! render = true
//!
//! [source.vars]
//! bar = "bar"
//!
//! [build]
//! workers = 4
//! ```

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::template::{Value, Variables};
use crate::tree::builder::SnapshotBuilder;
use crate::tree::matcher::PatternPolicy;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod merge;
mod sources;

pub use sources::{default_config_path, DEFAULT_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirsnapConfig {
    /// What to snapshot
    #[serde(default)]
    pub source: SourceConfig,

    /// How to run the build
    #[serde(default)]
    pub build: BuildConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The snapshot inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory to read. Required, may come from the CLI instead.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Regular expression over relative paths to exclude
    #[serde(default)]
    pub exclude: String,

    /// Variables to substitute. Only primitive values are accepted.
    #[serde(default)]
    pub vars: BTreeMap<String, serde_json::Value>,

    /// Render file content as template
    #[serde(default = "default_true")]
    pub render: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            exclude: String::new(),
            vars: BTreeMap::new(),
            render: default_true(),
        }
    }
}

/// Build execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Worker threads (0 = one per core, 1 = sequential)
    #[serde(default)]
    pub workers: usize,

    /// Treat a malformed exclude pattern as "exclude nothing" instead of an error
    #[serde(default)]
    pub lenient_exclude: bool,

    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            lenient_exclude: false,
            follow_symlinks: default_true(),
            max_depth: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("source_dir: {0}")]
    SourceDir(String),

    #[error("vars: {0}")]
    Vars(String),

    #[error("logging: {0}")]
    Logging(String),
}

impl SourceConfig {
    /// Convert `vars` into template bindings
    ///
    /// Lists and maps are rejected, naming every offending key.
    pub fn variables(&self) -> Result<Variables, ValidationError> {
        let mut variables = Variables::new();
        let mut bad_vars = Vec::new();

        for (name, value) in &self.vars {
            let value = match value {
                serde_json::Value::String(s) => Value::String(s.clone()),
                serde_json::Value::Bool(b) => Value::Bool(*b),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                serde_json::Value::Null => Value::String(String::new()),
                serde_json::Value::Array(_) => {
                    bad_vars.push(format!("{} (list)", name));
                    continue;
                }
                serde_json::Value::Object(_) => {
                    bad_vars.push(format!("{} (map)", name));
                    continue;
                }
            };
            variables.insert(name.clone(), value);
        }

        if bad_vars.is_empty() {
            Ok(variables)
        } else {
            Err(ValidationError::Vars(format!(
                "cannot contain non-primitives; bad keys: {}",
                bad_vars.join(", ")
            )))
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        match &self.source_dir {
            None => errors.push(ValidationError::SourceDir("required".to_string())),
            Some(dir) if dir.as_os_str().is_empty() => {
                errors.push(ValidationError::SourceDir("cannot be empty".to_string()))
            }
            Some(_) => {}
        }
        if let Err(e) = self.variables() {
            errors.push(e);
        }
        errors
    }
}

impl DirsnapConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = self.source.validate();
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and turn the configuration into a ready-to-run builder
    pub fn snapshot_builder(&self) -> Result<SnapshotBuilder, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let source_dir = self
            .source
            .source_dir
            .clone()
            .ok_or_else(|| ApiError::ConfigError("source_dir is required".to_string()))?;
        let variables = self
            .source
            .variables()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let policy = if self.build.lenient_exclude {
            PatternPolicy::Lenient
        } else {
            PatternPolicy::Strict
        };

        Ok(SnapshotBuilder::new(source_dir)
            .exclude(self.source.exclude.clone())
            .pattern_policy(policy)
            .variables(variables)
            .render(self.source.render)
            .workers(self.build.workers)
            .with_walker_config(WalkerConfig {
                follow_symlinks: self.build.follow_symlinks,
                max_depth: self.build.max_depth,
            }))
    }
}

/// Loads [`DirsnapConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, `dirsnap.toml` in the working directory if present, and environment
    pub fn load() -> Result<DirsnapConfig, ApiError> {
        Self::load_layers(None)
    }

    /// Load defaults, the given file (which must exist), and environment
    pub fn load_from_file(config_path: &Path) -> Result<DirsnapConfig, ApiError> {
        Self::load_layers(Some(config_path))
    }

    fn load_layers(config_path: Option<&Path>) -> Result<DirsnapConfig, ApiError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_file(builder, config_path)?;
        let builder = sources::add_environment(builder);
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
