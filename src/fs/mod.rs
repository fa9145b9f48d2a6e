// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::SystemTime;

pub mod mock;

/// Boxed future returned by the async half of [`FileSystem`].
pub type FsFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

/// The subset of file metadata the filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Abstract filesystem interface.
///
/// Errors are plain `io::Error`s so callers can tell "not found" apart from
/// everything else via [`io::Error::kind`].
///
/// `metadata` and `read` are the async points of a comparison. `read_dir` is
/// synchronous: it only runs while expanding a version pattern, before the
/// comparison starts.
pub trait FileSystem: Send + Sync + Debug {
    /// Base directory for relative destinations when none is configured.
    fn current_dir(&self) -> io::Result<PathBuf>;

    fn metadata<'a>(&'a self, path: &'a Path) -> FsFuture<'a, FileStat>;

    fn read<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<u8>>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Implementation that uses `tokio::fs` and `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn metadata<'a>(&'a self, path: &'a Path) -> FsFuture<'a, FileStat> {
        Box::pin(async move {
            let meta = tokio::fs::metadata(path).await?;
            Ok(FileStat {
                modified: meta.modified()?,
                is_dir: meta.is_dir(),
            })
        })
    }

    fn read<'a>(&'a self, path: &'a Path) -> FsFuture<'a, Vec<u8>> {
        Box::pin(tokio::fs::read(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
