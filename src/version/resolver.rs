// src/version/resolver.rs

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::errors::{ChangedError, Result};
use crate::fs::FileSystem;

use super::compare::compare_versions;

/// Outcome of expanding a target pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// The pattern had no version segment and was returned untouched.
    Pure(PathBuf),
    /// Every version segment matched an existing entry.
    Resolved(PathBuf),
    /// A version segment matched nothing. Holds the prefix resolved so far,
    /// ending in `/`.
    NotFound(PathBuf),
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPath::Pure(p) | ResolvedPath::Resolved(p) | ResolvedPath::NotFound(p) => p,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolvedPath::NotFound(_))
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Turns a target pattern into a concrete path.
///
/// The filter only talks to this trait, so other version schemes can be
/// plugged in with [`crate::ChangeFilter::with_resolver`].
pub trait PathResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, fs: &dyn FileSystem, pattern: &Path) -> Result<ResolvedPath>;
}

/// Resolves `/`-separated patterns whose version segments are regular
/// expressions, e.g. `vendor/jquery/\d+\.\d+\.\d+/jquery.js` or
/// `build/[0-9.]+/out.js`.
///
/// A segment is a version segment when it is valid UTF-8 and contains `[` or
/// the `\d` escape. Each one is matched (anchored) against the entries of the
/// directory resolved so far and replaced by the highest match according to
/// [`compare_versions`]. Every other segment is literal, so `build/1.2.3`
/// stays `build/1.2.3` and non-UTF-8 names are carried over byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionPathResolver;

impl VersionPathResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Whether `s` contains a version wildcard (`\d` or `[`).
pub fn is_version_pattern(s: &str) -> bool {
    s.contains("\\d") || s.contains('[')
}

fn version_segment(comp: &OsStr) -> Option<&str> {
    comp.to_str().filter(|s| is_version_pattern(s))
}

fn has_version_segment(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => version_segment(name).is_some(),
        _ => false,
    })
}

impl PathResolver for VersionPathResolver {
    fn resolve(&self, fs: &dyn FileSystem, pattern: &Path) -> Result<ResolvedPath> {
        if !has_version_segment(pattern) {
            return Ok(ResolvedPath::Pure(pattern.to_path_buf()));
        }

        let mut root = OsString::new();
        let mut parts: Vec<OsString> = Vec::new();

        for comp in pattern.components() {
            match comp {
                Component::Prefix(prefix) => root.push(prefix.as_os_str()),
                Component::RootDir => root.push("/"),
                Component::CurDir => continue,
                Component::ParentDir => {
                    // Popping past the start is a no-op.
                    parts.pop();
                }
                Component::Normal(name) => match version_segment(name) {
                    Some(seg) => {
                        let dir = join_parts(&root, &parts, false);
                        match highest_match(fs, &dir, seg, pattern)? {
                            Some(entry) => parts.push(entry.into()),
                            None => {
                                let prefix = join_parts(&root, &parts, true);
                                debug!(pattern = ?pattern, segment = %seg, prefix = ?prefix, "no entry matches version segment");
                                return Ok(ResolvedPath::NotFound(prefix));
                            }
                        }
                    }
                    None => parts.push(name.to_os_string()),
                },
            }
        }

        let resolved = join_parts(&root, &parts, false);
        debug!(pattern = ?pattern, resolved = ?resolved, "resolved version pattern");
        Ok(ResolvedPath::Resolved(resolved))
    }
}

/// Pick the highest entry of `dir` whose name fully matches `segment`.
fn highest_match(
    fs: &dyn FileSystem,
    dir: &Path,
    segment: &str,
    pattern: &Path,
) -> Result<Option<String>> {
    let re = Regex::new(&format!("^(?:{segment})$")).map_err(|source| {
        ChangedError::InvalidPattern {
            segment: segment.to_string(),
            source,
        }
    })?;

    let entries = fs.read_dir(dir).map_err(|source| ChangedError::ReadDir {
        dir: dir.to_path_buf(),
        pattern: pattern.display().to_string(),
        source,
    })?;

    let best = entries
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .filter(|name| re.is_match(name))
        .max_by(|a, b| compare_versions(a, b))
        .map(str::to_string);

    debug!(dir = ?dir, %segment, chosen = ?best, "scanned directory for versions");
    Ok(best)
}

/// `./a/b` for relative patterns, `/a/b` for absolute ones.
fn join_parts(root: &OsStr, parts: &[OsString], trailing_slash: bool) -> PathBuf {
    let mut out = if root.is_empty() {
        OsString::from("./")
    } else {
        root.to_os_string()
    };
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push("/");
        }
        out.push(part);
    }
    if trailing_slash && !parts.is_empty() {
        out.push("/");
    }
    PathBuf::from(out)
}
