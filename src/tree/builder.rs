//! Snapshot builder: walk, filter, render, collect

use crate::error::{SnapshotError, WalkError};
use crate::snapshot::{RenderMode, Snapshot};
use crate::template::{Interpolator, Renderer, Variables};
use crate::tree::diagnostics::Diagnostics;
use crate::tree::matcher::{ExclusionPattern, PatternPolicy};
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Builds a [`Snapshot`] of one directory tree
///
/// Every build walks the tree from scratch. Traversal problems are reported to
/// a [`Diagnostics`] sink and skipped; a render failure aborts the build and
/// no partial snapshot is returned.
pub struct SnapshotBuilder {
    root: PathBuf,
    exclude: String,
    pattern_policy: PatternPolicy,
    variables: Variables,
    mode: RenderMode,
    renderer: Arc<dyn Renderer>,
    walker_config: Option<WalkerConfig>,
    workers: usize,
}

impl std::fmt::Debug for SnapshotBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotBuilder")
            .field("root", &self.root)
            .field("exclude", &self.exclude)
            .field("pattern_policy", &self.pattern_policy)
            .field("variables", &self.variables)
            .field("mode", &self.mode)
            .field("walker_config", &self.walker_config)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl SnapshotBuilder {
    /// Create a builder for `root` that renders every file with no variables
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            exclude: String::new(),
            pattern_policy: PatternPolicy::default(),
            variables: Variables::new(),
            mode: RenderMode::Render,
            renderer: Arc::new(Interpolator::new()),
            walker_config: None,
            workers: 0,
        }
    }

    /// Regex over relative paths; matching files are left out. Empty excludes nothing.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = pattern.into();
        self
    }

    pub fn pattern_policy(mut self, policy: PatternPolicy) -> Self {
        self.pattern_policy = policy;
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn render(mut self, render: bool) -> Self {
        self.mode = RenderMode::from(render);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = Some(config);
        self
    }

    /// Worker threads for reading and rendering. 0 uses the rayon default,
    /// 1 processes files on the calling thread.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Build the snapshot, discarding non-fatal diagnostics after logging them
    pub fn build(&self) -> Result<Snapshot, SnapshotError> {
        self.build_with(&Diagnostics::new())
    }

    /// Build the snapshot, reporting non-fatal traversal errors to `diagnostics`
    #[instrument(skip(self, diagnostics), fields(root = %self.root.display(), mode = ?self.mode))]
    pub fn build_with(&self, diagnostics: &Diagnostics) -> Result<Snapshot, SnapshotError> {
        let start = Instant::now();
        info!("Starting snapshot build");

        let metadata = std::fs::metadata(&self.root).map_err(|e| {
            error!("Snapshot root is not readable: {}", e);
            e
        })?;
        if !metadata.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a directory", self.root.display()),
            )
            .into());
        }

        let exclusion = ExclusionPattern::compile(&self.exclude, self.pattern_policy)?;

        let walker = match &self.walker_config {
            Some(config) => Walker::with_config(self.root.clone(), config.clone()),
            None => Walker::new(self.root.clone()),
        };
        let files: Vec<Entry> = walker
            .entries(diagnostics)
            .filter(|entry| !entry.is_dir)
            .filter(|entry| {
                let excluded = exclusion.matches(&entry.relative_path);
                if excluded {
                    debug!(path = %entry.relative_path, "Excluded by pattern");
                }
                !excluded
            })
            .collect();
        debug!(file_count = files.len(), "Walked filesystem");

        let mut entries = BTreeMap::new();
        for (relative_path, content) in self.process_all(&files, diagnostics)?.into_iter().flatten() {
            entries.insert(relative_path, content);
        }

        let snapshot = Snapshot::new(self.mode, entries);
        info!(
            file_count = snapshot.len(),
            skipped = diagnostics.len(),
            duration_ms = start.elapsed().as_millis(),
            "Snapshot build completed"
        );
        Ok(snapshot)
    }

    fn process_all(
        &self,
        files: &[Entry],
        diagnostics: &Diagnostics,
    ) -> Result<Vec<Option<(String, String)>>, SnapshotError> {
        match self.workers {
            1 => files
                .iter()
                .map(|entry| self.process_file(entry, diagnostics))
                .collect(),
            0 => files
                .par_iter()
                .map(|entry| self.process_file(entry, diagnostics))
                .collect(),
            n => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("dirsnap-worker-{i}"))
                    .build()
                    .map_err(|e| SnapshotError::ThreadPool(e.to_string()))?;
                pool.install(|| {
                    files
                        .par_iter()
                        .map(|entry| self.process_file(entry, diagnostics))
                        .collect()
                })
            }
        }
    }

    /// Read and render one file. `Ok(None)` means it was skipped and reported.
    ///
    /// Listing never opens the file, so sockets, FIFOs and unreadable files
    /// are still listed. Rendering only reads regular files.
    fn process_file(
        &self,
        entry: &Entry,
        diagnostics: &Diagnostics,
    ) -> Result<Option<(String, String)>, SnapshotError> {
        if self.mode == RenderMode::List {
            trace!(path = %entry.relative_path, "Listed file");
            return Ok(Some((entry.relative_path.clone(), String::new())));
        }

        let raw = match read_regular_file(&entry.resolved_path) {
            Ok(raw) => raw,
            Err(source) => {
                diagnostics.report(WalkError::Read {
                    path: entry.resolved_path.clone(),
                    source,
                });
                return Ok(None);
            }
        };

        let content = self
            .renderer
            .render(&raw, &self.variables)
            .map_err(|source| {
                error!(path = %entry.relative_path, error = %source, "Render failed");
                SnapshotError::Render {
                    path: entry.relative_path.clone(),
                    source,
                }
            })?;
        trace!(path = %entry.relative_path, bytes = raw.len(), "Rendered file");

        Ok(Some((entry.relative_path.clone(), content)))
    }
}

/// Read `path` if it is a regular file. Opening a FIFO would block.
fn read_regular_file(path: &Path) -> std::io::Result<Vec<u8>> {
    if !std::fs::metadata(path)?.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    std::fs::read(path)
}

/// Build a snapshot with the default renderer and settings
pub fn build(
    root: impl AsRef<Path>,
    exclude: &str,
    variables: &Variables,
    render: bool,
) -> Result<Snapshot, SnapshotError> {
    SnapshotBuilder::new(root.as_ref().to_path_buf())
        .exclude(exclude)
        .variables(variables.clone())
        .render(render)
        .build()
}
