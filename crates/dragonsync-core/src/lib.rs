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

//! Asset descriptors, fetch results, and collaborator traits shared across
//! the dragonsync workspace.
//!
//! Layout: `model/` (descriptors, results, run status), `service/`
//! (version/catalog resolver traits), `error.rs` (`CoreError`).

pub mod error;
pub mod model;
pub mod service;

pub use error::{CoreError, CoreResult};
pub use model::{
    AssetCategory, AssetDescriptor, CatalogPlan, FetchedAsset, RunStatus, SkippedEntry,
};
pub use service::{CatalogSource, VersionSource};
