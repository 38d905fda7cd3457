//! Prometheus-backed batch metrics and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - A sync run is a batch job, so the registry is rendered once at the end
//!   and optionally written as a node-exporter textfile.

use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{TelemetryError, TelemetryResult};

/// Result of a single fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Payload was delivered to the result channel.
    Delivered,
    /// The fetch failed and produced no result.
    Failed,
}

impl FetchOutcome {
    const fn as_label(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

/// Result of a single persist attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Payload reached its destination.
    Written,
    /// The write failed.
    Failed,
}

impl PersistOutcome {
    const fn as_label(self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Failed => "failed",
        }
    }
}

/// Prometheus registry for one sync run.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    fetches_total: IntCounterVec,
    persists_total: IntCounterVec,
    fetch_bytes_total: IntCounter,
    fetches_in_flight: IntGauge,
    assets_planned: IntGauge,
    run_duration_ms: IntGauge,
    // Category-independent totals for the snapshot.
    fetches_delivered: AtomicU64,
    fetches_failed: AtomicU64,
}

/// Snapshot of the run counters for summaries and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Descriptors handed to the dispatcher.
    pub assets_planned: i64,
    /// Fetches that delivered a payload.
    pub fetches_delivered: u64,
    /// Fetches that failed.
    pub fetches_failed: u64,
    /// Payload bytes received.
    pub fetch_bytes_total: u64,
    /// Fetches currently running.
    pub fetches_in_flight: i64,
    /// Payloads written to disk.
    pub persists_written: u64,
    /// Writes that failed.
    pub persists_failed: u64,
    /// Wall-clock duration of the run (ms).
    pub run_duration_ms: i64,
}

impl Metrics {
    /// Construct a new registry with the batch collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> TelemetryResult<Self> {
        let registry = Registry::new();

        let fetches_total = IntCounterVec::new(
            Opts::new("dragonsync_fetches_total", "Asset fetches by category and outcome"),
            &["category", "outcome"],
        )
        .map_err(register_error("dragonsync_fetches_total"))?;
        let persists_total = IntCounterVec::new(
            Opts::new("dragonsync_persists_total", "Asset writes by outcome"),
            &["outcome"],
        )
        .map_err(register_error("dragonsync_persists_total"))?;
        let fetch_bytes_total = IntCounter::with_opts(Opts::new(
            "dragonsync_fetch_bytes_total",
            "Payload bytes received from the CDN",
        ))
        .map_err(register_error("dragonsync_fetch_bytes_total"))?;
        let fetches_in_flight = IntGauge::with_opts(Opts::new(
            "dragonsync_fetches_in_flight",
            "Fetches started but not yet finished",
        ))
        .map_err(register_error("dragonsync_fetches_in_flight"))?;
        let assets_planned = IntGauge::with_opts(Opts::new(
            "dragonsync_assets_planned",
            "Descriptors resolved for the current run",
        ))
        .map_err(register_error("dragonsync_assets_planned"))?;
        let run_duration_ms = IntGauge::with_opts(Opts::new(
            "dragonsync_run_duration_ms",
            "Wall-clock duration of the last run (ms)",
        ))
        .map_err(register_error("dragonsync_run_duration_ms"))?;

        registry
            .register(Box::new(fetches_total.clone()))
            .map_err(register_error("dragonsync_fetches_total"))?;
        registry
            .register(Box::new(persists_total.clone()))
            .map_err(register_error("dragonsync_persists_total"))?;
        registry
            .register(Box::new(fetch_bytes_total.clone()))
            .map_err(register_error("dragonsync_fetch_bytes_total"))?;
        registry
            .register(Box::new(fetches_in_flight.clone()))
            .map_err(register_error("dragonsync_fetches_in_flight"))?;
        registry
            .register(Box::new(assets_planned.clone()))
            .map_err(register_error("dragonsync_assets_planned"))?;
        registry
            .register(Box::new(run_duration_ms.clone()))
            .map_err(register_error("dragonsync_run_duration_ms"))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                fetches_total,
                persists_total,
                fetch_bytes_total,
                fetches_in_flight,
                assets_planned,
                run_duration_ms,
                fetches_delivered: AtomicU64::new(0),
                fetches_failed: AtomicU64::new(0),
            }),
        })
    }

    /// Count a finished fetch for `category`.
    pub fn record_fetch(&self, category: &str, outcome: FetchOutcome) {
        self.inner
            .fetches_total
            .with_label_values(&[category, outcome.as_label()])
            .inc();
        let total = match outcome {
            FetchOutcome::Delivered => &self.inner.fetches_delivered,
            FetchOutcome::Failed => &self.inner.fetches_failed,
        };
        total.fetch_add(1, Ordering::Relaxed);
    }

    /// Add received payload bytes.
    pub fn add_fetch_bytes(&self, bytes: usize) {
        self.inner
            .fetch_bytes_total
            .inc_by(u64::try_from(bytes).unwrap_or(u64::MAX));
    }

    /// Count a finished write.
    pub fn record_persist(&self, outcome: PersistOutcome) {
        self.inner
            .persists_total
            .with_label_values(&[outcome.as_label()])
            .inc();
    }

    /// Mark a fetch as started.
    pub fn fetch_started(&self) {
        self.inner.fetches_in_flight.inc();
    }

    /// Mark a fetch as finished, whatever its outcome.
    pub fn fetch_finished(&self) {
        self.inner.fetches_in_flight.dec();
    }

    /// Set the planned descriptor gauge.
    pub fn set_assets_planned(&self, count: usize) {
        self.inner
            .assets_planned
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Record the run duration.
    pub fn observe_run_duration(&self, duration: Duration) {
        self.inner
            .run_duration_ms
            .set(Self::duration_to_ms(duration));
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Render and write the registry to `path` for a textfile collector.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write_textfile(&self, path: &Path) -> TelemetryResult<()> {
        let rendered = self.render()?;
        fs::write(path, rendered).map_err(|source| TelemetryError::MetricsWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Take a point-in-time snapshot of the run counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            assets_planned: self.inner.assets_planned.get(),
            fetches_delivered: self.inner.fetches_delivered.load(Ordering::Relaxed),
            fetches_failed: self.inner.fetches_failed.load(Ordering::Relaxed),
            fetch_bytes_total: self.inner.fetch_bytes_total.get(),
            fetches_in_flight: self.inner.fetches_in_flight.get(),
            persists_written: self
                .inner
                .persists_total
                .with_label_values(&[PersistOutcome::Written.as_label()])
                .get(),
            persists_failed: self
                .inner
                .persists_total
                .with_label_values(&[PersistOutcome::Failed.as_label()])
                .get(),
            run_duration_ms: self.inner.run_duration_ms.get(),
        }
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }
}

fn register_error(name: &'static str) -> impl Fn(prometheus::Error) -> TelemetryError {
    move |source| TelemetryError::MetricsRegister { name, source }
}
