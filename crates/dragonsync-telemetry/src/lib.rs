#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Telemetry primitives shared across the dragonsync workspace.
//!
//! Layout: `init.rs` (subscriber installation), `run_log.rs` (per-run log
//! file writer), `metrics.rs` (Prometheus batch counters), `error.rs`.

pub mod error;
pub mod init;
pub mod metrics;
pub mod run_log;

pub use error::{TelemetryError, TelemetryResult};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
pub use metrics::{FetchOutcome, Metrics, MetricsSnapshot, PersistOutcome};
pub use run_log::RunLog;
