//! Error types for directory snapshot building.
//!
//! Three layers: [`WalkError`] is non-fatal and only ever reported to a
//! diagnostics sink, [`SnapshotError`] aborts a build, and [`ApiError`] is what
//! the configuration and CLI layers surface.

use crate::template::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Traversal errors. The affected entry or subtree is skipped, the build continues.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Error reading {}: {source}", path.display())]
    Descend {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to derive a UTF-8 key for {} relative to {}", path.display(), root.display())]
    Relativize { path: PathBuf, root: PathBuf },

    #[error("Failed to resolve symlink {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Filesystem path the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            WalkError::Descend { path, .. }
            | WalkError::Relativize { path, .. }
            | WalkError::Resolve { path, .. }
            | WalkError::Read { path, .. } => path,
        }
    }
}

/// Errors that abort a snapshot build
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The root could not be used at all. Displayed as the underlying error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("file {path} failed to render: {source}")]
    Render {
        path: String,
        #[source]
        source: RenderError,
    },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

/// Errors surfaced by the configuration and CLI layers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::OutputError(err.to_string())
    }
}
