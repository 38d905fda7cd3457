//! Error types for asset resolution.
//!
//! # Design
//! - Constant messages; context lives in fields so callers can log it structurally.
//! - Resolution failures are the only errors that reach the orchestrator.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for catalog and version resolution.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A remote lookup failed before any descriptor could be produced.
    #[error("resolution request failed")]
    Resolution {
        /// Operation identifier.
        operation: &'static str,
        /// URL that was requested.
        url: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A remote lookup returned a non-success status.
    #[error("resolution response status error")]
    ResolutionStatus {
        /// Operation identifier.
        operation: &'static str,
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// A catalog document had an unexpected shape.
    #[error("catalog document malformed")]
    MalformedCatalog {
        /// Catalog identifier (for example `champion.json`).
        catalog: &'static str,
        /// Machine-readable reason.
        reason: &'static str,
    },
    /// A catalog contained no usable entries.
    #[error("catalog is empty")]
    EmptyCatalog {
        /// Catalog identifier.
        catalog: &'static str,
    },
    /// Category key did not match any known category.
    #[error("unknown asset category")]
    UnknownCategory {
        /// Value provided by the caller.
        value: String,
    },
    /// Preparing the output layout failed.
    #[error("output layout operation failed")]
    Layout {
        /// Directory or file involved.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl CoreError {
    /// Wrap an arbitrary error raised while resolving `url`.
    pub fn resolution(
        operation: &'static str,
        url: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::Resolution {
            operation,
            url: url.into(),
            source: Box::new(source),
        }
    }
}

/// Convenience alias for resolution results.
pub type CoreResult<T> = Result<T, CoreError>;
