//! Collaborator traits implemented by catalog adapters.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::model::CatalogPlan;

/// Resolves the current content version ("patch").
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Return the latest published version as an opaque token.
    async fn latest_version(&self) -> CoreResult<String>;
}

/// Resolves the descriptors to download for a given version.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Build the download plan for `version`.
    ///
    /// Entries that cannot be turned into descriptors are reported in
    /// [`CatalogPlan::skipped`]; an error means nothing usable was resolved.
    async fn resolve(&self, version: &str) -> CoreResult<CatalogPlan>;
}
