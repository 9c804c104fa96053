//! Dirsnap: Deterministic Directory Snapshots
//!
//! Walks a directory tree, renders every file through a template engine
//! (or just lists it), and fingerprints the result with a BLAKE3 content
//! identifier that changes whenever any file's name or content changes.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod template;
pub mod tree;

pub use error::{ApiError, SnapshotError, WalkError};
pub use snapshot::{RenderMode, Snapshot, SnapshotOutput};
pub use template::{Interpolator, RenderError, Renderer, Value, Variables};
pub use tree::builder::{build, SnapshotBuilder};
pub use tree::diagnostics::Diagnostics;
pub use tree::hasher::ContentId;
