//! Command-line surface of the `dragonsync` binary.
//!
//! Every flag falls back to a `DRAGONSYNC_*` environment variable. Values
//! given here override the configuration file.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use dragonsync_config::{ConfigOverrides, LogFormatSetting};
use dragonsync_core::AssetCategory;

/// Download Data Dragon image assets for the current patch.
#[derive(Debug, Parser)]
#[command(
    name = "dragonsync",
    about = "Batch downloader for Data Dragon image assets"
)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "DRAGONSYNC_CONFIG")]
    pub config: Option<PathBuf>,
    /// Output root; files land under `<output>/<patch>/`.
    #[arg(long, env = "DRAGONSYNC_OUTPUT")]
    pub output: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[arg(long, env = "DRAGONSYNC_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
    /// Delay between fetch launches in milliseconds.
    #[arg(long, env = "DRAGONSYNC_SPACING_MS")]
    pub spacing_ms: Option<u64>,
    /// Upper bound on concurrent fetches.
    #[arg(long, env = "DRAGONSYNC_MAX_IN_FLIGHT", value_parser = parse_max_in_flight)]
    pub max_in_flight: Option<NonZeroUsize>,
    /// Comma-separated categories, e.g. `splash,icon,item`.
    #[arg(
        long,
        env = "DRAGONSYNC_CATEGORIES",
        value_delimiter = ',',
        value_parser = parse_category
    )]
    pub categories: Option<Vec<AssetCategory>>,
    /// Catalog locale.
    #[arg(long, env = "DRAGONSYNC_LOCALE")]
    pub locale: Option<String>,
    /// Data Dragon base URL.
    #[arg(long, env = "DRAGONSYNC_DDRAGON_BASE")]
    pub ddragon_base: Option<String>,
    /// Log level filter; `RUST_LOG` takes precedence.
    #[arg(long, env = "DRAGONSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,
    /// Log output format.
    #[arg(long, env = "DRAGONSYNC_LOG_FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormatSetting>,
    /// Write Prometheus text metrics here after the run.
    #[arg(long, env = "DRAGONSYNC_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,
    /// Summary printed to stdout when the run ends.
    #[arg(long, env = "DRAGONSYNC_SUMMARY", value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
    /// Use this patch instead of asking Data Dragon for the latest one.
    #[arg(long, env = "DRAGONSYNC_PATCH")]
    pub patch: Option<String>,
}

/// Format of the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// A few human-readable lines.
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

impl Cli {
    /// Configuration overrides carried by the flags.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_root: self.output.clone(),
            timeout_secs: self.timeout_secs,
            spacing_ms: self.spacing_ms,
            max_in_flight: self.max_in_flight,
            categories: self.categories.clone(),
            locale: self.locale.clone(),
            ddragon_base: self.ddragon_base.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

fn parse_category(input: &str) -> Result<AssetCategory, String> {
    AssetCategory::from_str(input.trim()).map_err(|_| format!("unknown category '{input}'"))
}

fn parse_log_format(input: &str) -> Result<LogFormatSetting, String> {
    LogFormatSetting::from_str(input).map_err(|_| format!("unknown log format '{input}'"))
}

fn parse_max_in_flight(input: &str) -> Result<NonZeroUsize, String> {
    input
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|err| format!("invalid concurrency limit '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_has_no_overrides() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["dragonsync"])?;
        assert_eq!(cli.overrides(), ConfigOverrides::default());
        assert_eq!(cli.summary, SummaryFormat::Text);
        assert!(cli.patch.is_none());
        Ok(())
    }

    #[test]
    fn flags_map_onto_overrides() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "dragonsync",
            "--output",
            "assets",
            "--timeout-secs",
            "5",
            "--spacing-ms",
            "20",
            "--max-in-flight",
            "8",
            "--categories",
            "splash,item",
            "--log-format",
            "json",
            "--summary",
            "json",
            "--patch",
            "14.1.1",
        ])?;

        let overrides = cli.overrides();
        assert_eq!(overrides.output_root, Some(PathBuf::from("assets")));
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(overrides.spacing_ms, Some(20));
        assert_eq!(overrides.max_in_flight, NonZeroUsize::new(8));
        assert_eq!(
            overrides.categories,
            Some(vec![AssetCategory::Splash, AssetCategory::Item])
        );
        assert_eq!(overrides.log_format, Some(LogFormatSetting::Json));
        assert_eq!(cli.summary, SummaryFormat::Json);
        assert_eq!(cli.patch.as_deref(), Some("14.1.1"));
        Ok(())
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(Cli::try_parse_from(["dragonsync", "--categories", "splash,skins"]).is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = parse_max_in_flight("0").err();
        assert!(err.is_some_and(|message| message.contains("invalid concurrency limit")));
    }
}
