use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use serde::Deserialize;

use crate::fs::FileSystem;

/// A file travelling through the pipeline.
///
/// `contents == None` marks a placeholder (a directory entry, a stream
/// marker, ...). Such files are never compared and always pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory that `relative()` is computed against (the glob base of
    /// whatever produced this file).
    pub base: PathBuf,
    pub modified: SystemTime,
    pub contents: Option<Vec<u8>>,
}

impl SourceFile {
    pub fn new(
        base: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        modified: SystemTime,
        contents: Option<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            modified,
            contents,
        }
    }

    /// Read a file's metadata and contents through `fs`.
    pub async fn load(
        fs: &dyn FileSystem,
        base: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
    ) -> std::io::Result<Self> {
        let path = path.into();
        let stat = fs.metadata(&path).await?;
        let contents = if stat.is_dir {
            None
        } else {
            Some(fs.read(&path).await?)
        };
        Ok(Self::new(base, path, stat.modified, contents))
    }

    /// Whether this file carries no contents.
    pub fn is_null(&self) -> bool {
        self.contents.is_none()
    }

    /// Path of the file relative to `base`.
    ///
    /// Files that do not live under `base` fall back to their file name.
    pub fn relative(&self) -> PathBuf {
        match self.path.strip_prefix(&self.base) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => self
                .path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| self.path.clone()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Built-in staleness strategies, as named in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Forward when the source is strictly newer than the target.
    #[default]
    #[serde(alias = "modification-time")]
    Mtime,
    /// Forward when source and target contents hash differently.
    #[serde(alias = "content-hash", alias = "sha1")]
    Hash,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mtime" | "modification-time" => Ok(StrategyKind::Mtime),
            "hash" | "content-hash" | "sha1" => Ok(StrategyKind::Hash),
            other => Err(format!(
                "invalid has_changed: {other} (expected \"mtime\" or \"hash\")"
            )),
        }
    }
}

/// Log verbosity for [`crate::logging::init_logging`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}
