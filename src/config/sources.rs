//! Config sources: a TOML file and `DIRSNAP_*` environment variables

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "dirsnap.toml";

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Add the config file source. An explicit path must exist; the default one is optional.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    config_path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::Message(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!(config_path = %path.display(), "Loading config file");
            builder.add_source(File::from(path).required(true))
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!(config_path = %path.display(), "Loading default config file");
            }
            builder.add_source(File::from(path.as_path()).required(false))
        }
    };
    Ok(builder)
}

/// Add environment overrides, e.g. `DIRSNAP_SOURCE__EXCLUDE` or `DIRSNAP_BUILD__WORKERS`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("DIRSNAP")
            .prefix_separator("_")
            .separator("__"),
    )
}
