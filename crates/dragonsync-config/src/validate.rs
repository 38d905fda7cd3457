//! Validation helpers for loaded configuration.

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::SyncConfig;

impl SyncConfig {
    /// Check every section for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field encountered.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "http",
                "timeout_secs",
                Some("0".to_string()),
                "must_be_positive",
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("http", "user_agent", None, "empty"));
        }
        if self.dispatch.channel_capacity == 0 {
            return Err(ConfigError::invalid(
                "dispatch",
                "channel_capacity",
                Some("0".to_string()),
                "must_be_positive",
            ));
        }
        validate_base_url("ddragon_base", &self.source.ddragon_base)?;
        validate_base_url("community_base", &self.source.community_base)?;
        if self.source.locale.trim().is_empty() {
            return Err(ConfigError::invalid("source", "locale", None, "empty"));
        }
        if self.output.root.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output", "root", None, "empty"));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::invalid("categories", "categories", None, "empty"));
        }
        for correction in &self.name_corrections {
            if correction.from.trim().is_empty() || correction.to.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "name_corrections",
                    "from",
                    Some(format!("{} -> {}", correction.from, correction.to)),
                    "empty",
                ));
            }
            if correction.from == correction.to {
                return Err(ConfigError::invalid(
                    "name_corrections",
                    "to",
                    Some(correction.to.clone()),
                    "identical_to_source",
                ));
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging", "level", None, "empty"));
        }
        Ok(())
    }
}

fn validate_base_url(field: &'static str, value: &str) -> ConfigResult<()> {
    let parsed = Url::parse(value)
        .map_err(|_| ConfigError::invalid("source", field, Some(value.to_string()), "invalid_url"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "source",
            field,
            Some(value.to_string()),
            "unsupported_scheme",
        ));
    }
    Ok(())
}
