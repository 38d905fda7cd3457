//! # Design
//!
//! - Centralize errors raised while bootstrapping and running a batch.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Map every variant onto a process exit code in one place.

use std::error::Error as _;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Exit code for invalid configuration or arguments.
pub const EXIT_INVALID: u8 = 2;
/// Exit code for a run that could not complete.
pub const EXIT_FAILURE: u8 = 3;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: dragonsync_config::ConfigError,
    },
    /// Telemetry could not be installed or written.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: dragonsync_telemetry::TelemetryError,
    },
    /// Version, catalog or layout resolution failed.
    #[error("catalog resolution failed")]
    Resolution {
        /// Operation identifier.
        operation: &'static str,
        /// Source resolution error.
        source: dragonsync_core::CoreError,
    },
    /// Pipeline components could not be built.
    #[error("pipeline operation failed")]
    Pipeline {
        /// Operation identifier.
        operation: &'static str,
        /// Source pipeline error.
        source: dragonsync_pipeline::PipelineError,
    },
    /// A background task ended abnormally.
    #[error("background task failed")]
    Join {
        /// Operation identifier.
        operation: &'static str,
        /// Source join error.
        source: tokio::task::JoinError,
    },
    /// The run summary could not be rendered.
    #[error("summary rendering failed")]
    Summary {
        /// Source serialization error.
        source: serde_json::Error,
    },
    /// A command-line value was rejected.
    #[error("invalid argument")]
    InvalidArgument {
        /// Argument that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: dragonsync_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: dragonsync_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn resolution(
        operation: &'static str,
        source: dragonsync_core::CoreError,
    ) -> Self {
        Self::Resolution { operation, source }
    }

    pub(crate) const fn pipeline(
        operation: &'static str,
        source: dragonsync_pipeline::PipelineError,
    ) -> Self {
        Self::Pipeline { operation, source }
    }

    /// Process exit code for the error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } | Self::InvalidArgument { .. } => EXIT_INVALID,
            _ => EXIT_FAILURE,
        }
    }

    /// One-line message with the operation and the full source chain.
    #[must_use]
    pub fn display_message(&self) -> String {
        let mut message = match self {
            Self::Config { operation, .. }
            | Self::Telemetry { operation, .. }
            | Self::Resolution { operation, .. }
            | Self::Pipeline { operation, .. }
            | Self::Join { operation, .. } => format!("{self} ({operation})"),
            Self::InvalidArgument {
                field,
                reason,
                value,
            } => match value {
                Some(value) => format!("{self}: {field} {reason} ({value})"),
                None => format!("{self}: {field} {reason}"),
            },
            Self::Summary { .. } => self.to_string(),
        };
        let mut source = self.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            dragonsync_config::ConfigError::Io {
                path: PathBuf::from("dragonsync.json"),
                source: io::Error::other("missing"),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));

        let telemetry = AppError::telemetry(
            "run_log.attach",
            dragonsync_telemetry::TelemetryError::RunLogOpen {
                path: PathBuf::from("logs.txt"),
                source: io::Error::other("denied"),
            },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));

        let resolution = AppError::resolution(
            "version.latest",
            dragonsync_core::CoreError::EmptyCatalog {
                catalog: "versions.json",
            },
        );
        assert!(matches!(resolution, AppError::Resolution { .. }));

        let pipeline = AppError::pipeline(
            "fetcher.new",
            dragonsync_pipeline::PipelineError::Persist {
                path: PathBuf::from("a.png"),
                source: io::Error::other("full"),
            },
        );
        assert!(matches!(pipeline, AppError::Pipeline { .. }));
    }

    #[test]
    fn exit_codes_separate_invalid_input_from_run_failures() {
        let invalid = AppError::InvalidArgument {
            field: "categories",
            reason: "empty",
            value: None,
        };
        assert_eq!(invalid.exit_code(), EXIT_INVALID);

        let resolution = AppError::resolution(
            "catalog.resolve",
            dragonsync_core::CoreError::EmptyCatalog {
                catalog: "categories",
            },
        );
        assert_eq!(resolution.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn display_message_walks_the_source_chain() {
        let err = AppError::resolution(
            "version.latest",
            dragonsync_core::CoreError::EmptyCatalog {
                catalog: "versions.json",
            },
        );
        let message = err.display_message();
        assert!(message.starts_with("catalog resolution failed (version.latest): "));
        assert!(message.len() > "catalog resolution failed (version.latest): ".len());
    }
}
