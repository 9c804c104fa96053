//! Source Tree
//!
//! Everything between a directory on disk and a [`Snapshot`](crate::snapshot::Snapshot):
//! walking, relative path keys, exclusion, per-file rendering and the content identifier.

pub mod builder;
pub mod diagnostics;
pub mod hasher;
pub mod matcher;
pub mod path;
pub mod walker;
