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

//! Application wiring for the dragonsync batch downloader.
//!
//! Layout: `cli.rs` (flags), `bootstrap.rs` (dependency construction),
//! `orchestrator.rs` (run sequencing), `report.rs` (run summary),
//! `error.rs` (`AppError` and exit codes).

pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use bootstrap::{BootstrapDependencies, load_config, logging_config, run_app, run_app_with};
pub use cli::{Cli, SummaryFormat};
pub use error::{AppError, AppResult, EXIT_FAILURE, EXIT_INVALID};
pub use orchestrator::{Orchestrator, OrchestratorDeps, RunOptions};
pub use report::{FetchFailureLine, PersistFailureLine, RunReport};
