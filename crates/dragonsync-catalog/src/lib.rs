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

//! Data Dragon collaborators: version and catalog resolution, URL and path
//! construction, and descriptor planning.
//!
//! Layout: `client.rs` (HTTP catalog reads), `urls.rs` (per-category URL
//! formats), `layout.rs` (output directories), `corrections.rs` (catalog
//! name fix-ups), `planner.rs` (descriptor planning).

pub mod client;
pub mod corrections;
pub mod layout;
pub mod planner;
pub mod urls;

pub use client::{DataDragonClient, ItemEntry, ItemListing, RuneEntry};
pub use corrections::{NameCorrections, NameVariant};
pub use layout::OutputLayout;
pub use planner::CatalogPlanner;
pub use urls::UrlBuilder;
