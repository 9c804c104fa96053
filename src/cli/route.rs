//! CLI route: single route table and run context.

use crate::cli::parse::{Commands, SourceArgs};
use crate::cli::presentation::{format_output_json, format_output_text};
use crate::config::{ConfigLoader, DirsnapConfig};
use crate::error::ApiError;
use crate::tree::diagnostics::Diagnostics;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;

/// Runtime context for CLI execution: the loaded configuration.
pub struct RunContext {
    config: DirsnapConfig,
}

impl RunContext {
    /// Create run context from an optional config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn from_config(config: DirsnapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DirsnapConfig {
        &self.config
    }

    /// Run one command and return what should be printed on stdout
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Build { source, format } => {
                if format != "text" && format != "json" {
                    return Err(ApiError::ConfigError(format!(
                        "Invalid output format: {} (must be 'text' or 'json')",
                        format
                    )));
                }
                let config = self.with_overrides(source);
                let builder = config.snapshot_builder()?;
                let diagnostics = Diagnostics::new();
                let output = builder.build_with(&diagnostics)?.into_output();

                if format == "json" {
                    format_output_json(&output)
                } else {
                    let color = config.logging.color && std::io::stdout().is_terminal();
                    Ok(format_output_text(&output, diagnostics.len(), color))
                }
            }
            Commands::Id { source } => {
                let builder = self.with_overrides(source).snapshot_builder()?;
                Ok(builder.build()?.content_id().to_string())
            }
        }
    }

    /// Apply CLI flags on top of the loaded configuration
    fn with_overrides(&self, args: &SourceArgs) -> DirsnapConfig {
        let mut config = self.config.clone();

        if let Some(ref dir) = args.source_dir {
            config.source.source_dir = Some(dir.clone());
        }
        if let Some(ref exclude) = args.exclude {
            config.source.exclude = exclude.clone();
        }
        for (key, value) in &args.vars {
            config
                .source
                .vars
                .insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        if args.no_render {
            config.source.render = false;
        }
        if let Some(workers) = args.workers {
            config.build.workers = workers;
        }
        if args.lenient_exclude {
            config.build.lenient_exclude = true;
        }

        debug!(
            source_dir = ?config.source.source_dir,
            render = config.source.render,
            var_count = config.source.vars.len(),
            "Resolved snapshot configuration"
        );
        config
    }
}
