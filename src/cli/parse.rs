//! CLI parse: clap types for dirsnap. Definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dirsnap - render a directory tree through templates and fingerprint it
#[derive(Parser, Debug)]
#[command(name = "dirsnap")]
#[command(about = "Render a directory tree through templates and fingerprint the result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: ./dirsnap.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the snapshot and print its outputs
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build the snapshot and print only its content identifier
    Id {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Snapshot inputs; each one overrides the config file
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory to read
    pub source_dir: Option<PathBuf>,

    /// Regular expression over relative paths to exclude
    #[arg(long)]
    pub exclude: Option<String>,

    /// Variable to substitute (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// List files instead of rendering them
    #[arg(long)]
    pub no_render: bool,

    /// Worker threads (0 = one per core, 1 = sequential)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Ignore a malformed exclude pattern instead of failing
    #[arg(long)]
    pub lenient_exclude: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
