//! Merge rules: defaults, override order.
//!
//! Sources are layered defaults < config file < environment. CLI flags are
//! applied on top of the deserialized result by the CLI layer.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("source.exclude", "")?
        .set_default("source.render", true)?
        .set_default("build.workers", 0)?
        .set_default("build.lenient_exclude", false)?
        .set_default("build.follow_symlinks", true)
}
