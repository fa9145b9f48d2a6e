#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use changed::fs::FileSystem;
use changed::fs::mock::MockFileSystem;
use changed::{ChangeFilter, ChangeStrategy, ChangedOptions, SourceFile};

/// Builder for `SourceFile` to simplify test setup.
///
/// Defaults: base `/src`, modified at the epoch, contents `b""`.
pub struct SourceFileBuilder {
    file: SourceFile,
}

impl SourceFileBuilder {
    /// A file at `<base>/<relative>`.
    pub fn new(relative: &str) -> Self {
        let base = PathBuf::from("/src");
        Self {
            file: SourceFile::new(
                base.clone(),
                base.join(relative),
                SystemTime::UNIX_EPOCH,
                Some(Vec::new()),
            ),
        }
    }

    pub fn base(mut self, base: &str) -> Self {
        let rel = self.file.relative();
        self.file.base = PathBuf::from(base);
        self.file.path = self.file.base.join(rel);
        self
    }

    pub fn contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.file.contents = Some(contents.into());
        self
    }

    /// Mark the file as content-less.
    pub fn null(mut self) -> Self {
        self.file.contents = None;
        self
    }

    pub fn modified(mut self, modified: SystemTime) -> Self {
        self.file.modified = modified;
        self
    }

    pub fn build(self) -> SourceFile {
        self.file
    }
}

/// Builder for a `ChangeFilter` over a `MockFileSystem`.
pub struct ChangeFilterBuilder {
    dest: String,
    options: ChangedOptions,
    fs: MockFileSystem,
}

impl ChangeFilterBuilder {
    /// Filter into `dest` with cwd `/work`.
    pub fn new(dest: &str, fs: &MockFileSystem) -> Self {
        Self {
            dest: dest.to_string(),
            options: ChangedOptions {
                cwd: Some(PathBuf::from("/work")),
                ..Default::default()
            },
            fs: fs.clone(),
        }
    }

    pub fn strategy(mut self, strategy: ChangeStrategy) -> Self {
        self.options.has_changed = strategy;
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.options.extension = Some(ext.to_string());
        self
    }

    pub fn cwd(mut self, cwd: Option<&str>) -> Self {
        self.options.cwd = cwd.map(PathBuf::from);
        self
    }

    pub fn build(self) -> ChangeFilter {
        let fs: Arc<dyn FileSystem> = Arc::new(self.fs);
        ChangeFilter::with_fs(&self.dest, self.options, fs)
            .expect("Failed to build change filter from builder")
    }
}
