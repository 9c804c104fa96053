//! Snapshot of a directory tree and the outputs derived from it

use crate::tree::hasher::ContentId;
use crate::tree::path::base_name;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether file contents go through the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Store rendered content per file
    Render,
    /// Store an empty placeholder per file; content is never read
    List,
}

impl From<bool> for RenderMode {
    fn from(render: bool) -> Self {
        if render {
            RenderMode::Render
        } else {
            RenderMode::List
        }
    }
}

/// Mapping from relative path to content for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    mode: RenderMode,
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new(mode: RenderMode, entries: BTreeMap<String, String>) -> Self {
        Self { mode, entries }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.entries.get(relative_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn content_id(&self) -> ContentId {
        ContentId::from_pairs(
            self.entries
                .iter()
                .map(|(path, content)| (path.as_str(), content.as_bytes())),
        )
    }

    /// Shape the snapshot into the outputs for its mode
    pub fn into_output(self) -> SnapshotOutput {
        let id = self.content_id();
        match self.mode {
            RenderMode::Render => SnapshotOutput::Rendered {
                rendered: self.entries,
                id,
            },
            RenderMode::List => {
                let map = self
                    .entries
                    .keys()
                    .map(|path| (path.clone(), base_name(path).to_string()))
                    .collect();
                SnapshotOutput::Listing {
                    list: self.entries.into_keys().collect(),
                    map,
                    id,
                }
            }
        }
    }
}

/// What a build hands back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SnapshotOutput {
    Rendered {
        rendered: BTreeMap<String, String>,
        id: ContentId,
    },
    Listing {
        list: Vec<String>,
        map: BTreeMap<String, String>,
        id: ContentId,
    },
}

impl SnapshotOutput {
    pub fn id(&self) -> ContentId {
        match self {
            SnapshotOutput::Rendered { id, .. } | SnapshotOutput::Listing { id, .. } => *id,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SnapshotOutput::Rendered { rendered, .. } => rendered.len(),
            SnapshotOutput::Listing { list, .. } => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
