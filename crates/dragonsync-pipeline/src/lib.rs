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

//! Concurrent fan-out/fan-in download pipeline.
//!
//! Layout: `fetcher.rs` (one retrieval per descriptor), `dispatcher.rs`
//! (collector that owns and closes the result channel), `sink.rs`
//! (persistence of delivered payloads), `error.rs`.

pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod sink;

pub use dispatcher::{Dispatch, DispatchOptions, DispatchReport, Dispatcher, FetchFailure};
pub use error::{FetchError, FetchResult, PipelineError, PipelineResult};
pub use fetcher::{AssetFetcher, HttpFetcher};
pub use sink::{PersistFailure, Sink, SinkReport, persist};
