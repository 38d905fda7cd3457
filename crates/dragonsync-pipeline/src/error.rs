//! Error types for the download pipeline.
//!
//! # Design
//! - Fetch and persist errors are local to one asset; they are logged and
//!   recorded in reports, never propagated as a batch failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single asset retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting, sending or waiting for the response failed (including timeouts).
    #[error("asset request failed")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("asset response status error")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Reading the response body failed.
    #[error("asset body read failed")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// URL the failed request targeted.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Body { url, .. } => url,
        }
    }

    /// Short machine-readable reason for reports.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Transport { source, .. } if source.is_timeout() => "timeout".to_string(),
            Self::Transport { .. } => "transport".to_string(),
            Self::Status { status, .. } => format!("status_{status}"),
            Self::Body { .. } => "body".to_string(),
        }
    }
}

/// Convenience alias for fetch results.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while building or running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client")]
    Client {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// Writing a payload to its destination failed.
    #[error("failed to persist asset")]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn status_reason_carries_code() {
        let err = FetchError::Status {
            url: "http://cdn.test/missing.png".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "asset response status error");
        assert_eq!(err.reason(), "status_404");
        assert_eq!(err.url(), "http://cdn.test/missing.png");
    }

    #[test]
    fn persist_error_keeps_io_source() {
        let err = PipelineError::Persist {
            path: PathBuf::from("assets/14.1.1/Icon/Ahri.png"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("disk full"));
    }
}
