//! Filesystem walker for traversing directory structures

use crate::error::WalkError;
use crate::tree::diagnostics::Diagnostics;
use crate::tree::path;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One node found below the walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// `/`-separated, NFC-normalized path relative to the root. Snapshot key.
    pub relative_path: String,
    /// Absolute path with symlinks resolved. Used for reading.
    pub resolved_path: PathBuf,
    pub is_dir: bool,
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Follow symbolic links while descending (default: true)
    pub follow_symlinks: bool,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            max_depth: None,
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Lazily walk the tree in native directory order
    ///
    /// The root itself is not yielded. Entries that cannot be read, made
    /// relative or resolved are reported to `diagnostics` and skipped; an
    /// unreadable directory skips its whole subtree.
    pub fn entries<'d>(&self, diagnostics: &'d Diagnostics) -> Entries<'d> {
        let inner = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter();
        Entries {
            root: self.root.clone(),
            inner,
            diagnostics,
        }
    }

    /// Walk the whole tree and return entries sorted by relative path
    pub fn walk(&self, diagnostics: &Diagnostics) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.entries(diagnostics).collect();
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        entries
    }
}

/// Iterator returned by [`Walker::entries`]
pub struct Entries<'d> {
    root: PathBuf,
    inner: walkdir::IntoIter,
    diagnostics: &'d Diagnostics,
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    self.diagnostics.report(WalkError::Descend { path, source });
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let Some(relative_path) = path::relative_key(&self.root, entry.path()) else {
                self.diagnostics.report(WalkError::Relativize {
                    path: entry.path().to_path_buf(),
                    root: self.root.clone(),
                });
                continue;
            };

            let resolved_path = match path::resolve(entry.path()) {
                Ok(resolved) => resolved,
                Err(source) => {
                    self.diagnostics.report(WalkError::Resolve {
                        path: entry.path().to_path_buf(),
                        source,
                    });
                    continue;
                }
            };

            return Some(Entry {
                relative_path,
                resolved_path,
                is_dir: entry.file_type().is_dir(),
            });
        }
    }
}
