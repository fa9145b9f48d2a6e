// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::filter::ChangedOptions;
use crate::types::{LogLevel, StrategyKind};

/// Filter configuration as read from TOML, before validation.
///
/// ```toml
/// dest = "dist"
/// cwd = "/work/project"
/// extension = ".js"
/// has_changed = "hash"
/// log_level = "debug"
/// ```
///
/// Every field is optional at this level; [`FilterConfig`] enforces that
/// `dest` is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterConfig {
    /// Destination root the sources are compared against.
    #[serde(default)]
    pub dest: Option<String>,

    /// Base directory for a relative `dest`.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Replacement extension for target paths.
    #[serde(default)]
    pub extension: Option<String>,

    /// `"mtime"` (default) or `"hash"`.
    #[serde(default)]
    pub has_changed: Option<StrategyKind>,

    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// Validated filter configuration.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub dest: String,
    pub cwd: Option<PathBuf>,
    pub extension: Option<String>,
    pub has_changed: StrategyKind,
    pub log_level: Option<LogLevel>,
}

impl FilterConfig {
    pub(crate) fn new_unchecked(raw: RawFilterConfig, dest: String) -> Self {
        Self {
            dest,
            cwd: raw.cwd,
            extension: raw.extension.filter(|ext| !ext.is_empty()),
            has_changed: raw.has_changed.unwrap_or_default(),
            log_level: raw.log_level,
        }
    }

    /// The runtime options this config describes.
    pub fn to_options(&self) -> ChangedOptions {
        ChangedOptions {
            cwd: self.cwd.clone(),
            has_changed: self.has_changed.into(),
            extension: self.extension.clone(),
        }
    }
}
