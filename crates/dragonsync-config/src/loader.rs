//! Configuration loading from JSON documents.
//!
//! # Design
//! - Missing fields fall back to [`SyncConfig::default`]; unknown fields are rejected.
//! - Loading does not validate; callers apply overrides first and then call
//!   [`SyncConfig::validate`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::SyncConfig;

/// Load configuration from `path`, or defaults when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load(path: Option<&Path>) -> ConfigResult<SyncConfig> {
    let Some(path) = path else {
        debug!("no configuration file supplied; using defaults");
        return Ok(SyncConfig::default());
    };

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        source,
    })?;
    debug!(path = %path.display(), "configuration file loaded");
    Ok(config)
}

/// Parse configuration from an in-memory JSON document.
///
/// # Errors
///
/// Returns an error if the document does not parse.
pub fn load_from_str(raw: &str) -> ConfigResult<SyncConfig> {
    serde_json::from_str(raw).map_err(|source| ConfigError::Parse { path: None, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragonsync_core::AssetCategory;

    #[test]
    fn missing_path_yields_defaults() -> anyhow::Result<()> {
        assert_eq!(load(None)?, SyncConfig::default());
        Ok(())
    }

    #[test]
    fn partial_document_keeps_defaults_for_other_sections() -> anyhow::Result<()> {
        let config = load_from_str(
            r#"{ "dispatch": { "spacing_ms": 25 }, "categories": ["icon", "item"] }"#,
        )?;
        assert_eq!(config.dispatch.spacing_ms, 25);
        assert_eq!(config.dispatch.channel_capacity, 64);
        assert_eq!(
            config.categories,
            vec![AssetCategory::Icon, AssetCategory::Item]
        );
        assert_eq!(config.http, SyncConfig::default().http);
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = load_from_str(r#"{ "dispatch": { "retries": 3 } }"#);
        assert!(matches!(result, Err(ConfigError::Parse { path: None, .. })));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let result = load(Some(Path::new("/definitely/missing/dragonsync.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
