// src/strategy/mtime.rs

use std::path::Path;

use tracing::debug;

use crate::fs::FileSystem;
use crate::types::SourceFile;

use super::{Decision, DecisionFuture, HasChanged, target_unavailable};

/// Changed when the source was modified strictly after the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByModificationTime;

impl HasChanged for ByModificationTime {
    fn has_changed<'a>(
        &'a self,
        fs: &'a dyn FileSystem,
        source: &'a SourceFile,
        target: &'a Path,
    ) -> DecisionFuture<'a> {
        Box::pin(async move {
            match fs.metadata(target).await {
                Ok(stat) => {
                    let newer = source.modified > stat.modified;
                    debug!(source = ?source.path, target = ?target, newer, "compared modification times");
                    if newer {
                        Decision::Changed
                    } else {
                        Decision::Unchanged
                    }
                }
                Err(err) => target_unavailable(target, err),
            }
        })
    }
}
