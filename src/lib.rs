// src/lib.rs

//! `changed`: a build-pipeline stage that only lets through source files
//! that are changed relative to their counterpart in a destination tree.
//!
//! ```no_run
//! use changed::{ChangeFilter, ChangedOptions, ChangeStrategy, SourceFile};
//! use changed::fs::RealFileSystem;
//!
//! # async fn demo() -> changed::errors::Result<()> {
//! let filter = ChangeFilter::new(
//!     "dist",
//!     ChangedOptions {
//!         has_changed: ChangeStrategy::ContentHash,
//!         ..Default::default()
//!     },
//! )?;
//!
//! let file = SourceFile::load(&RealFileSystem, "src", "src/app.js").await?;
//! if let Some(file) = filter.process(file).await?.into_file() {
//!     println!("rebuild {}", file.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Target paths may carry version wildcards (`vendor/lib/\d+\.\d+/lib.js`),
//! which are expanded to the highest version present on disk; see
//! [`version::VersionPathResolver`].

pub mod config;
pub mod errors;
pub mod filter;
pub mod fs;
pub mod logging;
pub mod strategy;
pub mod types;
pub mod version;

pub use errors::{ChangedError, Result};
pub use filter::{
    ChangeFilter, ChangedOptions, FilterReport, Filtered, StageEvent, StageStats, run_stage,
    spawn_stage,
};
pub use strategy::{ByContentHash, ByModificationTime, ChangeStrategy, Decision, HasChanged};
pub use types::{LogLevel, SourceFile, StrategyKind};
pub use version::{PathResolver, ResolvedPath, VersionPathResolver, compare_versions};
