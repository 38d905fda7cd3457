//! Turns catalogs into asset descriptors for one patch.
//!
//! # Design
//! - Catalogs are resolved per group (champions, items, runes) and only for
//!   groups with at least one selected category.
//! - A failed group is recorded as a skipped entry so the run still proceeds
//!   with the other groups; the run fails only when every group failed.
//! - An empty plan is returned as-is; the orchestrator decides what it means.

use std::path::PathBuf;

use async_trait::async_trait;
use dragonsync_config::SyncConfig;
use dragonsync_core::{
    AssetCategory, AssetDescriptor, CatalogPlan, CatalogSource, CoreError, CoreResult,
    SkippedEntry,
};
use tracing::{info, warn};

use crate::client::DataDragonClient;
use crate::corrections::NameCorrections;
use crate::layout::OutputLayout;
use crate::urls::UrlBuilder;

/// Catalog-backed [`CatalogSource`].
#[derive(Clone)]
pub struct CatalogPlanner {
    client: DataDragonClient,
    ddragon_base: String,
    community_base: String,
    root: PathBuf,
    categories: Vec<AssetCategory>,
    corrections: NameCorrections,
}

struct Group {
    catalog: &'static str,
    outcome: CoreResult<CatalogPlan>,
}

impl CatalogPlanner {
    /// Planner for the configured endpoints, output root, categories and corrections.
    #[must_use]
    pub fn from_config(client: DataDragonClient, config: &SyncConfig) -> Self {
        Self {
            client,
            ddragon_base: config.source.ddragon_base.clone(),
            community_base: config.source.community_base.clone(),
            root: config.output.root.clone(),
            categories: config.categories.clone(),
            corrections: NameCorrections::new(config.name_corrections.clone()),
        }
    }

    fn champion_categories(&self) -> Vec<AssetCategory> {
        self.categories
            .iter()
            .copied()
            .filter(|category| category.is_champion())
            .collect()
    }

    fn wants(&self, category: AssetCategory) -> bool {
        self.categories.contains(&category)
    }

    async fn champions(
        &self,
        version: &str,
        urls: &UrlBuilder,
        layout: &OutputLayout,
    ) -> CoreResult<CatalogPlan> {
        let names = self.client.champion_names(version).await?;
        let categories = self.champion_categories();
        let mut plan = CatalogPlan::default();
        for name in &names {
            for category in &categories {
                for variant in self.corrections.variants(name, *category) {
                    let Some(url) = urls.champion(*category, &variant.request) else {
                        continue;
                    };
                    plan.descriptors.push(AssetDescriptor::new(
                        variant.file.as_str(),
                        *category,
                        url,
                        layout.destination(*category, &variant.file),
                    ));
                }
            }
        }
        Ok(plan)
    }

    async fn items(
        &self,
        version: &str,
        urls: &UrlBuilder,
        layout: &OutputLayout,
    ) -> CoreResult<CatalogPlan> {
        let listing = self.client.item_images(version).await?;
        let descriptors = listing
            .entries
            .iter()
            .map(|item| {
                AssetDescriptor::new(
                    item.name.as_str(),
                    AssetCategory::Item,
                    urls.item(&item.image),
                    layout.destination(AssetCategory::Item, &item.name),
                )
            })
            .collect();
        Ok(CatalogPlan {
            descriptors,
            skipped: listing.skipped,
        })
    }

    async fn runes(
        &self,
        version: &str,
        urls: &UrlBuilder,
        layout: &OutputLayout,
    ) -> CoreResult<CatalogPlan> {
        let runes = self.client.rune_icons(version).await?;
        let descriptors = runes
            .iter()
            .map(|rune| {
                AssetDescriptor::new(
                    rune.key.as_str(),
                    AssetCategory::Rune,
                    urls.rune(&rune.icon),
                    layout.destination(AssetCategory::Rune, &rune.key),
                )
            })
            .collect();
        Ok(CatalogPlan {
            descriptors,
            skipped: Vec::new(),
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogPlanner {
    async fn resolve(&self, version: &str) -> CoreResult<CatalogPlan> {
        let urls = UrlBuilder::new(&self.ddragon_base, &self.community_base, version);
        let layout = OutputLayout::new(&self.root, version);

        let mut groups = Vec::new();
        if !self.champion_categories().is_empty() {
            groups.push(Group {
                catalog: "champion.json",
                outcome: self.champions(version, &urls, &layout).await,
            });
        }
        if self.wants(AssetCategory::Item) {
            groups.push(Group {
                catalog: "item.json",
                outcome: self.items(version, &urls, &layout).await,
            });
        }
        if self.wants(AssetCategory::Rune) {
            groups.push(Group {
                catalog: "runesReforged.json",
                outcome: self.runes(version, &urls, &layout).await,
            });
        }

        if groups.is_empty() {
            return Err(CoreError::EmptyCatalog {
                catalog: "categories",
            });
        }

        let attempted = groups.len();
        let mut failed = 0;
        let mut plan = CatalogPlan::default();
        let mut last_error = None;
        for group in groups {
            match group.outcome {
                Ok(resolved) => plan.extend(resolved),
                Err(err) => {
                    warn!(catalog = group.catalog, error = %err, "catalog group unavailable");
                    plan.skipped.push(SkippedEntry {
                        source: group.catalog.to_string(),
                        key: "*".to_string(),
                        reason: err.to_string(),
                    });
                    failed += 1;
                    last_error = Some(err);
                }
            }
        }

        if failed == attempted
            && let Some(err) = last_error
        {
            return Err(err);
        }

        info!(
            version = %version,
            descriptors = plan.descriptors.len(),
            skipped = plan.skipped.len(),
            "catalog plan resolved"
        );
        Ok(plan)
    }
}
