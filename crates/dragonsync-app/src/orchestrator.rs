//! Sequences one batch run.
//!
//! # Design
//! - Resolution (version, layout, catalog) is fatal; nothing is downloaded
//!   when it fails.
//! - The dispatcher returns its channel immediately; the sink drains it on the
//!   current task and the run only ends once every write has finished.
//! - Per-asset failures are reported but never change the run status.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dragonsync_catalog::OutputLayout;
use dragonsync_core::{AssetCategory, CatalogSource, RunStatus, VersionSource};
use dragonsync_pipeline::{Dispatcher, Sink};
use dragonsync_telemetry::{Metrics, RunLog};
use tracing::{Instrument, Span, error, field, info, info_span, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::report::{RunOutcome, RunReport};

/// Per-run choices that do not come from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Patch to use instead of the latest published one.
    pub patch: Option<String>,
    /// Prometheus textfile written after the run.
    pub metrics_file: Option<PathBuf>,
}

/// Collaborators wired together by the bootstrap.
pub struct OrchestratorDeps {
    /// Resolves the current patch.
    pub versions: Arc<dyn VersionSource>,
    /// Resolves the descriptor list for a patch.
    pub catalog: Arc<dyn CatalogSource>,
    /// Launches fetches.
    pub dispatcher: Dispatcher,
    /// Persists delivered payloads.
    pub sink: Sink,
    /// Run counters.
    pub metrics: Metrics,
    /// Per-run log file handle.
    pub run_log: RunLog,
    /// Output root holding one directory per patch.
    pub output_root: PathBuf,
    /// Categories whose directories are prepared.
    pub categories: Vec<AssetCategory>,
    /// Whether `logs.txt` is written for the run.
    pub write_run_log: bool,
    /// Per-run options.
    pub options: RunOptions,
}

/// Drives version resolution, dispatch, and persistence for one batch.
pub struct Orchestrator {
    deps: OrchestratorDeps,
}

impl Orchestrator {
    /// Wrap the collaborators.
    #[must_use]
    pub const fn new(deps: OrchestratorDeps) -> Self {
        Self { deps }
    }

    /// Run the batch to completion.
    ///
    /// # Errors
    ///
    /// Returns an error when the patch, the output layout, or the catalog
    /// cannot be resolved. Individual fetch and write failures are reported in
    /// the [`RunReport`] instead.
    pub async fn run(&self) -> AppResult<RunReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", run_id = %run_id, version = field::Empty);
        let result = self.execute(run_id).instrument(span).await;
        self.deps.run_log.detach();
        result
    }

    async fn execute(&self, run_id: Uuid) -> AppResult<RunReport> {
        let deps = &self.deps;
        let started_at = Utc::now();
        let clock = Instant::now();

        let version = match &deps.options.patch {
            Some(patch) => {
                info!(version = %patch, "using requested patch");
                patch.clone()
            }
            None => deps
                .versions
                .latest_version()
                .await
                .map_err(|err| AppError::resolution("version.latest", err))?,
        };
        Span::current().record("version", version.as_str());

        let layout = OutputLayout::new(&deps.output_root, &version);
        layout
            .prepare(&deps.categories)
            .map_err(|err| AppError::resolution("layout.prepare", err))?;
        if deps.write_run_log {
            deps.run_log
                .attach(&layout.log_file())
                .map_err(|err| AppError::telemetry("run_log.attach", err))?;
        }
        info!(output = %layout.version_dir().display(), "run started");

        let plan = deps
            .catalog
            .resolve(&version)
            .await
            .map_err(|err| AppError::resolution("catalog.resolve", err))?;
        for skipped in &plan.skipped {
            warn!(
                source = %skipped.source,
                key = %skipped.key,
                reason = %skipped.reason,
                "catalog entry skipped"
            );
        }

        let status = RunStatus::from_plan(&plan);
        let planned = plan.descriptors.len();
        deps.metrics.set_assets_planned(planned);

        let dispatch = deps.dispatcher.dispatch(plan.descriptors);
        let sink_report = deps.sink.clone().drain(dispatch.results).await;
        let dispatch_report = dispatch.completion.await.map_err(|source| AppError::Join {
            operation: "dispatch.completion",
            source,
        })?;

        deps.metrics.observe_run_duration(clock.elapsed());
        if let Some(path) = &deps.options.metrics_file
            && let Err(err) = deps.metrics.write_textfile(path)
        {
            warn!(path = %path.display(), error = %err, "metrics textfile not written");
        }

        let report = RunReport::from_outcome(RunOutcome {
            run_id,
            version,
            status,
            planned,
            skipped: plan.skipped,
            dispatch: dispatch_report,
            sink: sink_report,
            metrics: deps.metrics.snapshot(),
            started_at,
        });

        if status == RunStatus::Failure {
            error!("no assets could be resolved");
        }
        info!(
            status = %report.status,
            planned = report.planned,
            delivered = report.delivered,
            fetch_failures = report.fetch_failures.len(),
            persisted = report.persisted,
            persist_failures = report.persist_failures.len(),
            skipped = report.skipped.len(),
            "run finished"
        );
        Ok(report)
    }
}
