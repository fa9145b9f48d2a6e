// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangedError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Listing a directory while expanding a version pattern failed.
    #[error("cannot list {dir:?} while resolving {pattern:?}: {source}")]
    ReadDir {
        dir: PathBuf,
        pattern: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid version segment {segment:?}: {source}")]
    InvalidPattern {
        segment: String,
        #[source]
        source: regex::Error,
    },

    /// The target of a source file could not be inspected. `path` is the
    /// *source* file the failure belongs to.
    #[error("{path:?}: {source}")]
    Target {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChangedError {
    /// Whether the stage can keep going after this error.
    ///
    /// Only target inspection failures are reported alongside a forwarded
    /// file; everything else aborts processing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChangedError::Target { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ChangedError>;
