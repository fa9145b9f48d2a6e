// src/filter/target.rs

//! Utility functions for building target paths.

use std::path::{Component, Path, PathBuf};

/// Lexically resolve `.` and `..` components without touching the disk.
///
/// `..` at the root (or at the start of a relative path with nothing to pop)
/// is kept for relative paths and dropped for absolute ones, matching how the
/// OS would interpret them.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Replace the extension of `path`. A leading `.` on `ext` is optional.
///
/// Paths without an extension get one appended.
pub fn replace_extension(path: &Path, ext: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    out.set_extension(ext.trim_start_matches('.'));
    out
}
