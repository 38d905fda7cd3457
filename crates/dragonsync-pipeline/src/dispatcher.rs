//! Fan-out of fetches and ownership of the result channel.
//!
//! # Design
//! - `dispatch` returns the receiving end immediately; a background collector
//!   task launches one fetch task per descriptor and keeps the original sender.
//! - Every fetch task holds a sender clone and an [`InFlightGuard`]; the guard
//!   decrements the in-flight count on every exit path, including panics.
//! - The collector drops its sender only after joining every fetch task, so the
//!   channel closes exactly once, after the last completion.
//! - Failures never travel through the channel; they are logged and collected
//!   into the [`DispatchReport`].

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dragonsync_core::{AssetCategory, AssetDescriptor, FetchedAsset};
use dragonsync_telemetry::{FetchOutcome, Metrics};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::fetcher::AssetFetcher;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Scheduling knobs for a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Pause between consecutive launches; zero launches back to back.
    pub spacing: Duration,
    /// Optional cap on fetches running at the same time.
    pub max_in_flight: Option<NonZeroUsize>,
    /// Buffer size of the result channel (values below one are raised to one).
    pub channel_capacity: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            spacing: Duration::ZERO,
            max_in_flight: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// A fetch that terminated without delivering a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Asset name.
    pub name: String,
    /// Asset category.
    pub category: AssetCategory,
    /// Requested URL.
    pub url: String,
    /// Short machine-readable reason.
    pub reason: String,
}

impl FetchFailure {
    fn new(descriptor: &AssetDescriptor, reason: impl Into<String>) -> Self {
        Self {
            name: descriptor.name().to_string(),
            category: descriptor.category(),
            url: descriptor.source_url().to_string(),
            reason: reason.into(),
        }
    }
}

/// Completion accounting for one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Fetch tasks launched.
    pub launched: usize,
    /// Results handed to the channel.
    pub delivered: usize,
    /// Fetches that produced no result.
    pub failures: Vec<FetchFailure>,
}

impl DispatchReport {
    /// Whether every launched fetch is accounted for.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.delivered + self.failures.len() == self.launched
    }
}

/// Handles returned by [`Dispatcher::dispatch`].
#[derive(Debug)]
pub struct Dispatch {
    /// Delivered results; closes once every fetch has terminated.
    pub results: mpsc::Receiver<FetchedAsset>,
    /// Resolves to the report after the channel has been closed.
    pub completion: JoinHandle<DispatchReport>,
}

/// Launches concurrent fetches and owns the result channel.
#[derive(Clone)]
pub struct Dispatcher {
    fetcher: Arc<dyn AssetFetcher>,
    options: DispatchOptions,
    metrics: Option<Metrics>,
    in_flight: Arc<AtomicUsize>,
}

impl Dispatcher {
    /// Create a dispatcher over `fetcher`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        options: DispatchOptions,
        metrics: Option<Metrics>,
    ) -> Self {
        Self {
            fetcher,
            options,
            metrics,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fetches launched by this dispatcher that have not terminated yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start fetching `descriptors` and return the result channel right away.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn dispatch(&self, descriptors: Vec<AssetDescriptor>) -> Dispatch {
        let (sender, results) = mpsc::channel(self.options.channel_capacity.max(1));
        let collector = Collector {
            fetcher: Arc::clone(&self.fetcher),
            spacing: self.options.spacing,
            limiter: self
                .options
                .max_in_flight
                .map(|limit| Arc::new(Semaphore::new(limit.get()))),
            metrics: self.metrics.clone(),
            in_flight: Arc::clone(&self.in_flight),
        };
        let completion = tokio::spawn(collector.run(descriptors, sender));
        Dispatch {
            results,
            completion,
        }
    }
}

struct Collector {
    fetcher: Arc<dyn AssetFetcher>,
    spacing: Duration,
    limiter: Option<Arc<Semaphore>>,
    metrics: Option<Metrics>,
    in_flight: Arc<AtomicUsize>,
}

enum TaskOutcome {
    Delivered,
    Failed(FetchFailure),
}

impl Collector {
    async fn run(
        self,
        descriptors: Vec<AssetDescriptor>,
        sender: mpsc::Sender<FetchedAsset>,
    ) -> DispatchReport {
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(descriptors.len());
        let mut report = DispatchReport {
            launched: descriptors.len(),
            ..DispatchReport::default()
        };

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            if index > 0 && !self.spacing.is_zero() {
                tokio::time::sleep(self.spacing).await;
            }
            let guard = InFlightGuard::enter(Arc::clone(&self.in_flight), self.metrics.clone());
            let task = FetchTask {
                fetcher: Arc::clone(&self.fetcher),
                descriptor: descriptor.clone(),
                sender: sender.clone(),
                limiter: self.limiter.clone(),
                metrics: self.metrics.clone(),
            };
            pending.insert(index, descriptor);
            tasks.spawn(async move {
                let _guard = guard;
                (index, task.run().await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    pending.remove(&index);
                    match outcome {
                        TaskOutcome::Delivered => report.delivered += 1,
                        TaskOutcome::Failed(failure) => report.failures.push(failure),
                    }
                }
                Err(err) => warn!(error = %err, "fetch task terminated abnormally"),
            }
        }

        // Anything still pending belongs to a task that panicked or was cancelled.
        let mut abandoned: Vec<_> = pending.into_iter().collect();
        abandoned.sort_by_key(|(index, _)| *index);
        for (_, descriptor) in abandoned {
            record_failure(self.metrics.as_ref(), descriptor.category());
            report
                .failures
                .push(FetchFailure::new(&descriptor, "task_aborted"));
        }

        drop(sender);
        debug!(
            launched = report.launched,
            delivered = report.delivered,
            failed = report.failures.len(),
            "all fetches terminated; result channel closed"
        );
        report
    }
}

struct FetchTask {
    fetcher: Arc<dyn AssetFetcher>,
    descriptor: AssetDescriptor,
    sender: mpsc::Sender<FetchedAsset>,
    limiter: Option<Arc<Semaphore>>,
    metrics: Option<Metrics>,
}

impl FetchTask {
    async fn run(self) -> TaskOutcome {
        let _permit = match &self.limiter {
            Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
            None => None,
        };

        let category = self.descriptor.category();
        let fetched = self.fetcher.fetch(&self.descriptor).await;
        match fetched {
            Ok(payload) => {
                let size = payload.len();
                match self
                    .sender
                    .send(FetchedAsset::new(self.descriptor, payload))
                    .await
                {
                    Ok(()) => {
                        if let Some(metrics) = &self.metrics {
                            metrics.record_fetch(category.as_str(), FetchOutcome::Delivered);
                            metrics.add_fetch_bytes(size);
                        }
                        TaskOutcome::Delivered
                    }
                    Err(mpsc::error::SendError(asset)) => {
                        warn!(
                            asset = asset.descriptor.name(),
                            url = asset.descriptor.source_url(),
                            "result receiver dropped before delivery"
                        );
                        record_failure(self.metrics.as_ref(), category);
                        TaskOutcome::Failed(FetchFailure::new(&asset.descriptor, "receiver_closed"))
                    }
                }
            }
            Err(err) => {
                warn!(
                    asset = self.descriptor.name(),
                    category = %category,
                    url = err.url(),
                    error = %err,
                    reason = %err.reason(),
                    "asset fetch failed"
                );
                record_failure(self.metrics.as_ref(), category);
                TaskOutcome::Failed(FetchFailure::new(&self.descriptor, err.reason()))
            }
        }
    }
}

fn record_failure(metrics: Option<&Metrics>, category: AssetCategory) {
    if let Some(metrics) = metrics {
        metrics.record_fetch(category.as_str(), FetchOutcome::Failed);
    }
}

/// Counts a fetch as in flight from launch until the guard is dropped.
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
    metrics: Option<Metrics>,
}

impl InFlightGuard {
    fn enter(counter: Arc<AtomicUsize>, metrics: Option<Metrics>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        if let Some(metrics) = &metrics {
            metrics.fetch_started();
        }
        Self { counter, metrics }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
        if let Some(metrics) = &self.metrics {
            metrics.fetch_finished();
        }
    }
}
