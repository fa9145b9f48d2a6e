// src/filter/stage.rs

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{ChangedError, Result};
use crate::types::SourceFile;

use super::{ChangeFilter, Filtered};

/// What the stage pushes downstream.
#[derive(Debug)]
pub enum StageEvent {
    File(SourceFile),
    /// Non-fatal error for a file that is forwarded right after.
    Error(ChangedError),
}

/// Counters reported when the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    pub seen: usize,
    pub forwarded: usize,
    pub dropped: usize,
    pub errors: usize,
}

/// Pull files from `input` one at a time and push the changed ones to
/// `output`.
///
/// Each file is fully decided and emitted before the next one is received,
/// so output order follows input order. Returns when `input` closes, or with
/// the first unrecoverable error.
pub async fn run_stage(
    filter: &ChangeFilter,
    mut input: mpsc::Receiver<SourceFile>,
    output: mpsc::Sender<StageEvent>,
) -> Result<StageStats> {
    info!(dest = ?filter.dest(), strategy = ?filter.strategy(), "change filter stage started");
    let mut stats = StageStats::default();

    while let Some(file) = input.recv().await {
        stats.seen += 1;
        let path = file.path.clone();

        let outcome = match filter.process(file).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(file = ?path, error = %err, "change filter aborted");
                return Err(err);
            }
        };

        match outcome {
            Filtered::Forward(file) => {
                stats.forwarded += 1;
                emit(&output, StageEvent::File(file)).await?;
            }
            Filtered::ForwardWithError(file, err) => {
                stats.forwarded += 1;
                stats.errors += 1;
                emit(&output, StageEvent::Error(err)).await?;
                emit(&output, StageEvent::File(file)).await?;
            }
            Filtered::Dropped => {
                stats.dropped += 1;
                debug!(file = ?path, "unchanged; dropped");
            }
        }
    }

    info!(
        seen = stats.seen,
        forwarded = stats.forwarded,
        dropped = stats.dropped,
        errors = stats.errors,
        "change filter stage finished"
    );
    Ok(stats)
}

/// Spawn [`run_stage`] on the tokio runtime.
///
/// Returns the receiving end of the output channel and the stage handle.
pub fn spawn_stage(
    filter: ChangeFilter,
    input: mpsc::Receiver<SourceFile>,
    capacity: usize,
) -> (mpsc::Receiver<StageEvent>, JoinHandle<Result<StageStats>>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move { run_stage(&filter, input, tx).await });
    (rx, handle)
}

async fn emit(output: &mpsc::Sender<StageEvent>, event: StageEvent) -> Result<()> {
    output
        .send(event)
        .await
        .map_err(|_| ChangedError::Other(anyhow!("downstream closed")))
}
