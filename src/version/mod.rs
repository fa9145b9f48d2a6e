// src/version/mod.rs

//! Version-aware target paths.
//!
//! - `compare.rs`: numeric-aware ordering of version strings.
//! - `resolver.rs`: expanding wildcard version segments of a target path to
//!   the highest existing version on disk.

pub mod compare;
pub mod resolver;

pub use compare::compare_versions;
pub use resolver::{PathResolver, ResolvedPath, VersionPathResolver, is_version_pattern};
