//! End-of-run report and its stdout renderings.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dragonsync_core::{AssetCategory, RunStatus, SkippedEntry};
use dragonsync_pipeline::{DispatchReport, SinkReport};
use dragonsync_telemetry::MetricsSnapshot;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::SummaryFormat;
use crate::error::{AppError, AppResult};

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Identifier stamped on every log line of the run.
    pub run_id: Uuid,
    /// Patch the assets were downloaded for.
    pub version: String,
    /// Terminal status.
    pub status: RunStatus,
    /// Descriptors handed to the dispatcher.
    pub planned: usize,
    /// Fetches that produced a payload.
    pub delivered: usize,
    /// Fetches that ended without a payload.
    pub fetch_failures: Vec<FetchFailureLine>,
    /// Files written by the sink.
    pub persisted: usize,
    /// Writes that failed.
    pub persist_failures: Vec<PersistFailureLine>,
    /// Catalog entries dropped before dispatch.
    pub skipped: Vec<SkippedEntry>,
    /// Counter values at the end of the run.
    pub metrics: MetricsSnapshot,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end.
    pub finished_at: DateTime<Utc>,
}

/// Serializable view of a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailureLine {
    /// Asset name.
    pub name: String,
    /// Asset category.
    pub category: AssetCategory,
    /// URL that failed.
    pub url: String,
    /// Short failure reason.
    pub reason: String,
}

/// Serializable view of a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistFailureLine {
    /// Asset name.
    pub name: String,
    /// Destination that could not be written.
    pub path: PathBuf,
    /// Short failure reason.
    pub reason: String,
}

/// Inputs gathered by the orchestrator once the sink has drained.
pub(crate) struct RunOutcome {
    pub(crate) run_id: Uuid,
    pub(crate) version: String,
    pub(crate) status: RunStatus,
    pub(crate) planned: usize,
    pub(crate) skipped: Vec<SkippedEntry>,
    pub(crate) dispatch: DispatchReport,
    pub(crate) sink: SinkReport,
    pub(crate) metrics: MetricsSnapshot,
    pub(crate) started_at: DateTime<Utc>,
}

impl RunReport {
    pub(crate) fn from_outcome(outcome: RunOutcome) -> Self {
        let fetch_failures = outcome
            .dispatch
            .failures
            .into_iter()
            .map(|failure| FetchFailureLine {
                name: failure.name,
                category: failure.category,
                url: failure.url,
                reason: failure.reason,
            })
            .collect();
        let persist_failures = outcome
            .sink
            .failures
            .into_iter()
            .map(|failure| PersistFailureLine {
                name: failure.name,
                path: failure.path,
                reason: failure.reason,
            })
            .collect();
        Self {
            run_id: outcome.run_id,
            version: outcome.version,
            status: outcome.status,
            planned: outcome.planned,
            delivered: outcome.dispatch.delivered,
            fetch_failures,
            persisted: outcome.sink.persisted.len(),
            persist_failures,
            skipped: outcome.skipped,
            metrics: outcome.metrics,
            started_at: outcome.started_at,
            finished_at: Utc::now(),
        }
    }

    /// Render the report for stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON encoding fails.
    pub fn render(&self, format: SummaryFormat) -> AppResult<String> {
        match format {
            SummaryFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|source| AppError::Summary { source }),
            SummaryFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "patch {}: {}", self.version, self.status);
        let _ = writeln!(
            text,
            "fetched {}/{} assets, wrote {} files",
            self.delivered, self.planned, self.persisted
        );
        for skipped in &self.skipped {
            let _ = writeln!(
                text,
                "skipped {} {}: {}",
                skipped.source, skipped.key, skipped.reason
            );
        }
        for failure in &self.fetch_failures {
            let _ = writeln!(text, "fetch failed {}: {}", failure.url, failure.reason);
        }
        for failure in &self.persist_failures {
            let _ = writeln!(
                text,
                "write failed {}: {}",
                failure.path.display(),
                failure.reason
            );
        }
        text.truncate(text.trim_end().len());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonsync_pipeline::FetchFailure;

    fn outcome() -> RunOutcome {
        RunOutcome {
            run_id: Uuid::nil(),
            version: "14.1.1".to_string(),
            status: RunStatus::Partial,
            planned: 3,
            skipped: vec![SkippedEntry {
                source: "item.json".to_string(),
                key: "2003".to_string(),
                reason: "missing_image".to_string(),
            }],
            dispatch: DispatchReport {
                launched: 3,
                delivered: 2,
                failures: vec![FetchFailure {
                    name: "Ahri".to_string(),
                    category: AssetCategory::Splash,
                    url: "http://cdn/Ahri_0.jpg".to_string(),
                    reason: "status_404".to_string(),
                }],
            },
            sink: SinkReport {
                received: 2,
                persisted: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
                failures: Vec::new(),
            },
            metrics: MetricsSnapshot::default(),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn text_summary_lists_counts_and_failures() -> anyhow::Result<()> {
        let report = RunReport::from_outcome(outcome());

        let text = report.render(SummaryFormat::Text)?;

        assert_eq!(
            text,
            "patch 14.1.1: partial\n\
             fetched 2/3 assets, wrote 2 files\n\
             skipped item.json 2003: missing_image\n\
             fetch failed http://cdn/Ahri_0.jpg: status_404"
        );
        Ok(())
    }

    #[test]
    fn json_summary_carries_status_and_failures() -> anyhow::Result<()> {
        let report = RunReport::from_outcome(outcome());

        let value: serde_json::Value = serde_json::from_str(&report.render(SummaryFormat::Json)?)?;

        assert_eq!(value["status"], "partial");
        assert_eq!(value["persisted"], 2);
        assert_eq!(value["fetch_failures"][0]["category"], "splash");
        assert!(report.finished_at >= report.started_at);
        Ok(())
    }
}
