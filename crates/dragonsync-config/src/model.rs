//! Typed configuration models and override payloads.
//!
//! # Design
//! - Pure data carriers; every section derives serde with `#[serde(default)]` so
//!   partial config files are valid.
//! - Command-line overrides are modelled separately and applied last.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dragonsync_core::AssetCategory;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;

/// Complete configuration for a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Fan-out scheduling settings.
    pub dispatch: DispatchConfig,
    /// Remote endpoints and locale.
    pub source: SourceConfig,
    /// Local output settings.
    pub output: OutputConfig,
    /// Categories to download.
    pub categories: Vec<AssetCategory>,
    /// Catalog name fix-ups applied before URLs are built.
    pub name_corrections: Vec<NameCorrection>,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            dispatch: DispatchConfig::default(),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            categories: vec![
                AssetCategory::Splash,
                AssetCategory::Centered,
                AssetCategory::Icon,
                AssetCategory::Portrait,
                AssetCategory::Item,
                AssetCategory::Rune,
            ],
            name_corrections: vec![NameCorrection {
                from: defaults::FIDDLESTICKS.to_string(),
                to: defaults::FIDDLESTICKS_CORRECTED.to_string(),
                keep_original_for: vec![AssetCategory::Icon],
            }],
            logging: LoggingSettings::default(),
        }
    }
}

impl SyncConfig {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(root) = overrides.output_root {
            self.output.root = root;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.http.timeout_secs = timeout;
        }
        if let Some(spacing) = overrides.spacing_ms {
            self.dispatch.spacing_ms = spacing;
        }
        if let Some(limit) = overrides.max_in_flight {
            self.dispatch.max_in_flight = Some(limit);
        }
        if let Some(categories) = overrides.categories {
            self.categories = categories;
        }
        if let Some(locale) = overrides.locale {
            self.source.locale = locale;
        }
        if let Some(base) = overrides.ddragon_base {
            self.source.ddragon_base = base;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent header value.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// Timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fan-out scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Pause between consecutive fetch launches, in milliseconds.
    pub spacing_ms: u64,
    /// Optional cap on simultaneously running fetches.
    pub max_in_flight: Option<NonZeroUsize>,
    /// Result channel capacity.
    pub channel_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            spacing_ms: defaults::DISPATCH_SPACING_MS,
            max_in_flight: None,
            channel_capacity: defaults::CHANNEL_CAPACITY,
        }
    }
}

impl DispatchConfig {
    /// Launch spacing as a [`Duration`].
    #[must_use]
    pub const fn spacing(&self) -> Duration {
        Duration::from_millis(self.spacing_ms)
    }
}

/// Remote endpoints and locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Data Dragon base URL (no trailing slash required).
    pub ddragon_base: String,
    /// `CommunityDragon` base URL.
    pub community_base: String,
    /// Catalog locale, for example `en_US`.
    pub locale: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ddragon_base: defaults::DDRAGON_BASE.to_string(),
            community_base: defaults::COMMUNITY_BASE.to_string(),
            locale: defaults::LOCALE.to_string(),
        }
    }
}

/// Local output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory that receives `<version>/<category>/` trees.
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(defaults::OUTPUT_ROOT),
        }
    }
}

/// Data-cleaning rule for a catalog name published under another spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameCorrection {
    /// Name as it appears in the catalog.
    pub from: String,
    /// Name the CDN serves the assets under.
    pub to: String,
    /// Categories that additionally fetch the uncorrected spelling into the
    /// same destination.
    #[serde(default)]
    pub keep_original_for: Vec<AssetCategory>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Level directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormatSetting,
    /// Whether to mirror logs into `<root>/<version>/logs.txt`.
    pub run_log: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: LogFormatSetting::Auto,
            run_log: true,
        }
    }
}

/// Log output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Pretty in debug builds, JSON in release builds.
    #[default]
    Auto,
    /// Human-readable output.
    Pretty,
    /// Structured JSON lines.
    Json,
}

impl FromStr for LogFormatSetting {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidField {
                section: "logging",
                field: "format",
                value: Some(value.to_string()),
                reason: "unknown_format",
            }),
        }
    }
}

/// Values supplied on the command line or via environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replacement output root.
    pub output_root: Option<PathBuf>,
    /// Replacement request timeout.
    pub timeout_secs: Option<u64>,
    /// Replacement launch spacing.
    pub spacing_ms: Option<u64>,
    /// Replacement concurrency cap.
    pub max_in_flight: Option<NonZeroUsize>,
    /// Replacement category selection.
    pub categories: Option<Vec<AssetCategory>>,
    /// Replacement locale.
    pub locale: Option<String>,
    /// Replacement Data Dragon base URL.
    pub ddragon_base: Option<String>,
    /// Replacement log level.
    pub log_level: Option<String>,
    /// Replacement log format.
    pub log_format: Option<LogFormatSetting>,
}
