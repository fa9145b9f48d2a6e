// src/strategy/mod.rs

//! Staleness strategies: given a source file and its resolved target, is the
//! source "changed"?
//!
//! Two built-ins are provided ([`ByModificationTime`], [`ByContentHash`]);
//! anything else can implement [`HasChanged`] and be plugged in through
//! [`ChangeStrategy::Custom`].

pub mod hash;
pub mod mtime;

use std::fmt;
use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::types::{SourceFile, StrategyKind};

pub use hash::{ByContentHash, content_digest};
pub use mtime::ByModificationTime;

/// What a strategy concluded about one source/target pair.
#[derive(Debug)]
pub enum Decision {
    Changed,
    Unchanged,
    /// The target exists but could not be inspected. The filter forwards
    /// the source anyway and reports the error.
    Inconclusive(io::Error),
}

impl Decision {
    pub fn forwards(&self) -> bool {
        !matches!(self, Decision::Unchanged)
    }
}

pub type DecisionFuture<'a> = Pin<Box<dyn Future<Output = Decision> + Send + 'a>>;

/// A pluggable staleness check.
///
/// Implementations resolve to exactly one [`Decision`] per call; "target
/// missing" must come back as [`Decision::Changed`].
pub trait HasChanged: Send + Sync + fmt::Debug {
    fn has_changed<'a>(
        &'a self,
        fs: &'a dyn FileSystem,
        source: &'a SourceFile,
        target: &'a Path,
    ) -> DecisionFuture<'a>;
}

/// The strategy a [`crate::ChangeFilter`] runs.
#[derive(Debug, Clone, Default)]
pub enum ChangeStrategy {
    #[default]
    ModificationTime,
    ContentHash,
    Custom(Arc<dyn HasChanged>),
}

impl ChangeStrategy {
    pub fn custom(strategy: impl HasChanged + 'static) -> Self {
        ChangeStrategy::Custom(Arc::new(strategy))
    }

    pub fn as_has_changed(&self) -> &dyn HasChanged {
        match self {
            ChangeStrategy::ModificationTime => &ByModificationTime,
            ChangeStrategy::ContentHash => &ByContentHash,
            ChangeStrategy::Custom(inner) => inner.as_ref(),
        }
    }
}

impl From<StrategyKind> for ChangeStrategy {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Mtime => ChangeStrategy::ModificationTime,
            StrategyKind::Hash => ChangeStrategy::ContentHash,
        }
    }
}

/// Map a failed stat/read of the target to a decision.
///
/// A missing target means the source has never been built: changed.
pub(crate) fn target_unavailable(target: &Path, err: io::Error) -> Decision {
    if err.kind() == io::ErrorKind::NotFound {
        debug!(target = ?target, "target missing; treating source as changed");
        Decision::Changed
    } else {
        warn!(target = ?target, error = %err, "cannot inspect target");
        Decision::Inconclusive(err)
    }
}
