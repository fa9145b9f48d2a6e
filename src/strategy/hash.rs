// src/strategy/hash.rs

use std::path::Path;

use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;
use crate::types::SourceFile;

use super::{Decision, DecisionFuture, HasChanged, target_unavailable};

/// Hex-encoded blake3 digest of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}

/// Changed when the source contents and the target contents hash
/// differently.
///
/// The whole target is read into memory; targets are build outputs of the
/// same size class as the sources that are already held in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByContentHash;

impl HasChanged for ByContentHash {
    fn has_changed<'a>(
        &'a self,
        fs: &'a dyn FileSystem,
        source: &'a SourceFile,
        target: &'a Path,
    ) -> DecisionFuture<'a> {
        Box::pin(async move {
            let Some(contents) = source.contents.as_deref() else {
                return Decision::Changed;
            };

            match fs.read(target).await {
                Ok(target_data) => {
                    let source_digest = content_digest(contents);
                    let target_digest = content_digest(&target_data);
                    debug!(
                        source = ?source.path,
                        target = ?target,
                        source_digest = %source_digest,
                        target_digest = %target_digest,
                        "compared content digests"
                    );
                    if source_digest != target_digest {
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
