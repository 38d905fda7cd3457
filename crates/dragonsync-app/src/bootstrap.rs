//! Wires configuration, telemetry, catalog, and pipeline into an orchestrator.

use std::sync::Arc;

use dragonsync_catalog::{CatalogPlanner, DataDragonClient};
use dragonsync_config::{LogFormatSetting, LoggingSettings, SyncConfig};
use dragonsync_pipeline::{DispatchOptions, Dispatcher, HttpFetcher, Sink};
use dragonsync_telemetry::{LogFormat, LoggingConfig, Metrics, RunLog, init_logging};
use tracing::info;

use crate::cli::Cli;
use crate::error::{AppError, AppResult};
use crate::orchestrator::{Orchestrator, OrchestratorDeps, RunOptions};
use crate::report::RunReport;

/// Dependencies required to run one batch.
pub struct BootstrapDependencies {
    orchestrator: Orchestrator,
}

impl BootstrapDependencies {
    /// Build production collaborators from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if metrics registration or an HTTP client fails to build.
    pub fn from_config(
        config: &SyncConfig,
        options: RunOptions,
        run_log: RunLog,
    ) -> AppResult<Self> {
        let metrics = Metrics::new().map_err(|err| AppError::telemetry("metrics.new", err))?;
        let fetcher = HttpFetcher::new(config.http.timeout(), &config.http.user_agent)
            .map_err(|err| AppError::pipeline("fetcher.new", err))?;
        let client = DataDragonClient::from_config(config)
            .map_err(|err| AppError::resolution("catalog_client.new", err))?;
        let planner = CatalogPlanner::from_config(client.clone(), config);

        let dispatcher = Dispatcher::new(
            Arc::new(fetcher),
            DispatchOptions {
                spacing: config.dispatch.spacing(),
                max_in_flight: config.dispatch.max_in_flight,
                channel_capacity: config.dispatch.channel_capacity,
            },
            Some(metrics.clone()),
        );

        let orchestrator = Orchestrator::new(OrchestratorDeps {
            versions: Arc::new(client),
            catalog: Arc::new(planner),
            dispatcher,
            sink: Sink::new(Some(metrics.clone())),
            metrics,
            run_log,
            output_root: config.output.root.clone(),
            categories: config.categories.clone(),
            write_run_log: config.logging.run_log,
            options,
        });
        Ok(Self { orchestrator })
    }
}

/// Load the configuration file, apply flag overrides, and validate.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the merged values are invalid.
pub fn load_config(cli: &Cli) -> AppResult<SyncConfig> {
    let mut config = dragonsync_config::load(cli.config.as_deref())
        .map_err(|err| AppError::config("config.load", err))?;
    config.apply(cli.overrides());
    config
        .validate()
        .map_err(|err| AppError::config("config.validate", err))?;
    Ok(config)
}

/// Translate logging settings into subscriber options.
#[must_use]
pub fn logging_config(settings: &LoggingSettings) -> LoggingConfig<'_> {
    let format = match settings.format {
        LogFormatSetting::Auto => LogFormat::infer(),
        LogFormatSetting::Pretty => LogFormat::Pretty,
        LogFormatSetting::Json => LogFormat::Json,
    };
    LoggingConfig {
        level: &settings.level,
        format,
    }
}

fn run_options(cli: Cli) -> AppResult<RunOptions> {
    let patch = match cli.patch {
        Some(patch) if patch.trim().is_empty() => {
            return Err(AppError::InvalidArgument {
                field: "patch",
                reason: "empty",
                value: None,
            });
        }
        Some(patch) => Some(patch.trim().to_string()),
        None => None,
    };
    Ok(RunOptions {
        patch,
        metrics_file: cli.metrics_file,
    })
}

/// Entry point for one dragonsync run.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, or resolution fails.
pub async fn run_app(cli: Cli) -> AppResult<RunReport> {
    let config = load_config(&cli)?;
    let options = run_options(cli)?;
    let run_log = init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let dependencies = BootstrapDependencies::from_config(&config, options, run_log)?;
    run_app_with(dependencies).await
}

/// Run with injected dependencies.
///
/// # Errors
///
/// Returns an error if the orchestrator cannot resolve the run.
pub async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<RunReport> {
    info!("dragonsync bootstrap complete");
    dependencies.orchestrator.run().await
}
