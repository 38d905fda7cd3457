//! Persistence of delivered payloads.
//!
//! # Design
//! - A single loop reads the channel until it closes; channel closure is the
//!   only termination signal.
//! - Each result is written on its own task so slow disks never stall the loop.
//! - `drain` joins every write before returning, so callers never exit with a
//!   write still in progress.
//! - Writes create or truncate the destination; a second write of the same
//!   path leaves exactly the last payload.

use std::collections::HashMap;
use std::path::PathBuf;

use dragonsync_core::FetchedAsset;
use dragonsync_telemetry::{Metrics, PersistOutcome};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

/// A delivered payload that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    /// Asset name.
    pub name: String,
    /// Destination path.
    pub path: PathBuf,
    /// Rendered underlying error.
    pub reason: String,
}

/// Outcome of draining one result channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Results received from the channel.
    pub received: usize,
    /// Paths written successfully, in completion order.
    pub persisted: Vec<PathBuf>,
    /// Writes that failed.
    pub failures: Vec<PersistFailure>,
}

/// Consumes the result channel and writes every payload to disk.
#[derive(Clone, Default)]
pub struct Sink {
    metrics: Option<Metrics>,
}

impl Sink {
    /// Create a sink, optionally recording write outcomes.
    #[must_use]
    pub const fn new(metrics: Option<Metrics>) -> Self {
        Self { metrics }
    }

    /// Persist results until the channel closes, then wait for every write.
    pub async fn drain(self, mut results: mpsc::Receiver<FetchedAsset>) -> SinkReport {
        let mut writes = JoinSet::new();
        let mut pending = HashMap::new();
        let mut report = SinkReport::default();

        while let Some(asset) = results.recv().await {
            let index = report.received;
            report.received += 1;
            pending.insert(
                index,
                (
                    asset.descriptor.name().to_string(),
                    asset.descriptor.destination().to_path_buf(),
                ),
            );
            writes.spawn(async move { (index, persist(&asset).await) });
        }

        while let Some(joined) = writes.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    let Some((name, path)) = pending.remove(&index) else {
                        continue;
                    };
                    match outcome {
                        Ok(()) => {
                            debug!(asset = %name, path = %path.display(), "asset persisted");
                            self.record(PersistOutcome::Written);
                            report.persisted.push(path);
                        }
                        Err(err) => {
                            let reason = failure_reason(&err);
                            warn!(
                                asset = %name,
                                path = %path.display(),
                                error = %err,
                                reason = %reason,
                                "failed to persist asset"
                            );
                            self.record(PersistOutcome::Failed);
                            report.failures.push(PersistFailure { name, path, reason });
                        }
                    }
                }
                Err(err) => warn!(error = %err, "persist task terminated abnormally"),
            }
        }

        for (_, (name, path)) in pending {
            self.record(PersistOutcome::Failed);
            report.failures.push(PersistFailure {
                name,
                path,
                reason: "task_aborted".to_string(),
            });
        }

        report
    }

    fn record(&self, outcome: PersistOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_persist(outcome);
        }
    }
}

/// Write `asset`'s payload to its destination, creating or truncating the file.
///
/// # Errors
///
/// Returns [`PipelineError::Persist`] when the file cannot be created or written.
pub async fn persist(asset: &FetchedAsset) -> PipelineResult<()> {
    let path = asset.descriptor.destination();
    tokio::fs::write(path, asset.payload.as_ref())
        .await
        .map_err(|source| PipelineError::Persist {
            path: path.to_path_buf(),
            source,
        })
}

fn failure_reason(err: &PipelineError) -> String {
    match err {
        PipelineError::Persist { source, .. } => source.to_string(),
        PipelineError::Client { .. } => err.to_string(),
    }
}
