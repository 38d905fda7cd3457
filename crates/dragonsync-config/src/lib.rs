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

//! File-backed configuration for dragonsync runs.
//!
//! Layout: `model.rs` (typed config sections and overrides), `defaults.rs`
//! (baseline values), `loader.rs` (JSON file loading), `validate.rs`
//! (validation helpers), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_from_str};
pub use model::{
    ConfigOverrides, DispatchConfig, HttpConfig, LogFormatSetting, LoggingSettings,
    NameCorrection, OutputConfig, SourceConfig, SyncConfig,
};
