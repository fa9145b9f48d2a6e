// src/filter/mod.rs

//! The change filter pipeline stage.
//!
//! For every incoming [`SourceFile`] the filter:
//! 1. passes content-less files straight through,
//! 2. builds the target path `cwd / dest / <relative path>` (optionally with a
//!    new extension),
//! 3. expands version segments through a [`PathResolver`],
//! 4. asks the configured [`ChangeStrategy`] whether the source is changed,
//! 5. forwards or drops the file.
//!
//! [`stage`] drives a filter over tokio channels.

pub mod stage;
pub mod target;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::FilterConfig;
use crate::errors::{ChangedError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::strategy::{ChangeStrategy, Decision};
use crate::types::SourceFile;
use crate::version::{PathResolver, VersionPathResolver};

pub use stage::{StageEvent, StageStats, run_stage, spawn_stage};

/// Options for [`ChangeFilter`].
#[derive(Debug, Clone, Default)]
pub struct ChangedOptions {
    /// Base for a relative `dest`. Defaults to the filesystem's current
    /// directory at construction time.
    pub cwd: Option<PathBuf>,
    pub has_changed: ChangeStrategy,
    /// New extension for target paths, e.g. `".js"` when `.ts` sources
    /// compile to `.js` targets. Empty means "keep".
    pub extension: Option<String>,
}

/// Per-file result of [`ChangeFilter::process`].
#[derive(Debug)]
pub enum Filtered {
    Forward(SourceFile),
    /// The target could not be inspected; the file is forwarded so no work is
    /// lost, and the error is reported next to it.
    ForwardWithError(SourceFile, ChangedError),
    Dropped,
}

impl Filtered {
    pub fn is_forwarded(&self) -> bool {
        !matches!(self, Filtered::Dropped)
    }

    pub fn into_file(self) -> Option<SourceFile> {
        match self {
            Filtered::Forward(file) | Filtered::ForwardWithError(file, _) => Some(file),
            Filtered::Dropped => None,
        }
    }
}

/// Result of [`ChangeFilter::filter_all`].
#[derive(Debug, Default)]
pub struct FilterReport {
    pub forwarded: Vec<SourceFile>,
    pub errors: Vec<ChangedError>,
    pub dropped: usize,
}

/// Passes through only the source files that are changed relative to their
/// counterpart under `dest`.
#[derive(Clone)]
pub struct ChangeFilter {
    dest: PathBuf,
    cwd: PathBuf,
    extension: Option<String>,
    strategy: ChangeStrategy,
    resolver: Arc<dyn PathResolver>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for ChangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFilter")
            .field("dest", &self.dest)
            .field("cwd", &self.cwd)
            .field("extension", &self.extension)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl ChangeFilter {
    /// Filter against `dest` on the real filesystem.
    pub fn new(dest: impl AsRef<Path>, options: ChangedOptions) -> Result<Self> {
        Self::with_fs(dest, options, Arc::new(RealFileSystem))
    }

    /// Filter against `dest` using the given filesystem.
    ///
    /// Fails with [`ChangedError::ConfigError`] when `dest` is empty.
    pub fn with_fs(
        dest: impl AsRef<Path>,
        options: ChangedOptions,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let dest = dest.as_ref();
        if dest.as_os_str().is_empty() {
            return Err(ChangedError::ConfigError("`dest` required".to_string()));
        }

        let cwd = match options.cwd {
            Some(cwd) => cwd,
            None => fs.current_dir()?,
        };

        Ok(Self {
            dest: dest.to_path_buf(),
            cwd,
            extension: options.extension.filter(|ext| !ext.is_empty()),
            strategy: options.has_changed,
            resolver: Arc::new(VersionPathResolver),
            fs,
        })
    }

    /// Build a filter from a validated config file.
    pub fn from_config(cfg: &FilterConfig, fs: Arc<dyn FileSystem>) -> Result<Self> {
        Self::with_fs(&cfg.dest, cfg.to_options(), fs)
    }

    /// Swap the target path resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn strategy(&self) -> &ChangeStrategy {
        &self.strategy
    }

    /// Where `file` would be written, before version segments are expanded.
    pub fn target_path(&self, file: &SourceFile) -> PathBuf {
        let joined = self.cwd.join(&self.dest).join(file.relative());
        let target = target::normalize(&joined);
        match &self.extension {
            Some(ext) => target::replace_extension(&target, ext),
            None => target,
        }
    }

    /// Decide about a single file.
    ///
    /// `Err` means the target could not even be located (a directory on the
    /// way to a version segment is unreadable, or the segment is not a valid
    /// regex).
    pub async fn process(&self, file: SourceFile) -> Result<Filtered> {
        if file.is_null() {
            debug!(file = ?file.path, "no contents; passing through");
            return Ok(Filtered::Forward(file));
        }

        let target = self.target_path(&file);
        let resolved = self.resolver.resolve(self.fs.as_ref(), &target)?;

        if resolved.is_not_found() {
            debug!(file = ?file.path, target = %resolved, "no matching version on disk; forwarding");
            return Ok(Filtered::Forward(file));
        }

        let decision = self
            .strategy
            .as_has_changed()
            .has_changed(self.fs.as_ref(), &file, resolved.path())
            .await;

        debug!(file = ?file.path, target = %resolved, ?decision, "decided");

        Ok(match decision {
            Decision::Changed => Filtered::Forward(file),
            Decision::Unchanged => Filtered::Dropped,
            Decision::Inconclusive(source) => {
                let err = ChangedError::Target {
                    path: file.path.clone(),
                    source,
                };
                Filtered::ForwardWithError(file, err)
            }
        })
    }

    /// Run `files` through the filter one by one, in order.
    ///
    /// Stops at the first unrecoverable error.
    pub async fn filter_all<I>(&self, files: I) -> Result<FilterReport>
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut report = FilterReport::default();
        for file in files {
            match self.process(file).await? {
                Filtered::Forward(file) => report.forwarded.push(file),
                Filtered::ForwardWithError(file, err) => {
                    report.errors.push(err);
                    report.forwarded.push(file);
                }
                Filtered::Dropped => report.dropped += 1,
            }
        }
        Ok(report)
    }
}
