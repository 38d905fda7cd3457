//! HTTP reads of the Data Dragon version list and catalogs.
//!
//! # Design
//! - Every request maps failures into [`CoreError`] with an operation tag and
//!   the requested URL; these are the only errors that end a run.
//! - Catalog documents are decoded loosely: only the fields used downstream are
//!   modelled, and individual item entries that fail to decode are reported as
//!   skipped rather than failing the whole catalog.
//! - A keyed catalog without a `data` object is malformed, not a transport
//!   failure.
//! - Items whose names reduce to the same file stem are planned once; later
//!   keys are skipped as duplicates.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use dragonsync_config::SyncConfig;
use dragonsync_core::{CoreError, CoreResult, SkippedEntry, VersionSource};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

const CHAMPION_CATALOG: &str = "champion.json";
const ITEM_CATALOG: &str = "item.json";
const RUNE_CATALOG: &str = "runesReforged.json";
const VERSION_LIST: &str = "versions.json";

/// Item with a sanitised display name and its image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    /// Catalog key (item id).
    pub key: String,
    /// Display name reduced to letters.
    pub name: String,
    /// Image file name under `img/item/`.
    pub image: String,
}

/// Decoded item catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListing {
    /// Usable entries in key order.
    pub entries: Vec<ItemEntry>,
    /// Entries that could not be used.
    pub skipped: Vec<SkippedEntry>,
}

/// Rune or rune tree icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuneEntry {
    /// Rune key, used as the file stem.
    pub key: String,
    /// Icon path relative to `cdn/img/`.
    pub icon: String,
}

#[derive(Deserialize)]
struct KeyedCatalog {
    #[serde(default)]
    data: Option<Value>,
}

impl KeyedCatalog {
    fn into_entries(self, catalog: &'static str) -> CoreResult<BTreeMap<String, Value>> {
        match self.data {
            Some(Value::Object(map)) => Ok(map.into_iter().collect()),
            Some(_) => Err(CoreError::MalformedCatalog {
                catalog,
                reason: "data_not_object",
            }),
            None => Err(CoreError::MalformedCatalog {
                catalog,
                reason: "missing_data",
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    image: RawImage,
}

#[derive(Deserialize)]
struct RawImage {
    full: String,
}

#[derive(Deserialize)]
struct RawRuneTree {
    key: String,
    icon: String,
    #[serde(default)]
    slots: Vec<RawRuneSlot>,
}

#[derive(Deserialize)]
struct RawRuneSlot {
    #[serde(default)]
    runes: Vec<RawRune>,
}

#[derive(Deserialize)]
struct RawRune {
    key: String,
    icon: String,
}

/// Client for the Data Dragon JSON endpoints.
#[derive(Clone)]
pub struct DataDragonClient {
    http: Client,
    base: String,
    locale: String,
}

impl DataDragonClient {
    /// Wrap an existing HTTP client.
    #[must_use]
    pub fn new(http: Client, base: &str, locale: &str) -> Self {
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            locale: locale.to_string(),
        }
    }

    /// Build a client using the configured timeout, user agent, base URL and locale.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &SyncConfig) -> CoreResult<Self> {
        let http = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.as_str())
            .build()
            .map_err(|err| {
                CoreError::resolution("client.build", config.source.ddragon_base.as_str(), err)
            })?;
        Ok(Self::new(
            http,
            &config.source.ddragon_base,
            &config.source.locale,
        ))
    }

    /// Newest patch: the first element of `api/versions.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is not a string list, or
    /// the list is empty.
    pub async fn latest_version(&self) -> CoreResult<String> {
        let url = format!("{}/api/{VERSION_LIST}", self.base);
        let versions: Vec<String> = self.get_json("versions.fetch", &url).await?;
        let version = versions
            .into_iter()
            .next()
            .ok_or(CoreError::EmptyCatalog {
                catalog: VERSION_LIST,
            })?;
        info!(version = %version, "resolved latest patch");
        Ok(version)
    }

    /// Champion ids (the keys of `data` in `champion.json`), sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the document has no `data`
    /// object, or the object is empty.
    pub async fn champion_names(&self, version: &str) -> CoreResult<Vec<String>> {
        let url = self.data_url(version, CHAMPION_CATALOG);
        let catalog: KeyedCatalog = self.get_json("champions.fetch", &url).await?;
        let data = catalog.into_entries(CHAMPION_CATALOG)?;
        if data.is_empty() {
            return Err(CoreError::EmptyCatalog {
                catalog: CHAMPION_CATALOG,
            });
        }
        let names: Vec<String> = data.into_keys().collect();
        debug!(count = names.len(), "champion catalog resolved");
        Ok(names)
    }

    /// Items from `item.json` with letter-only names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the document has no `data`
    /// object. Undecodable and duplicate entries are reported in
    /// [`ItemListing::skipped`].
    pub async fn item_images(&self, version: &str) -> CoreResult<ItemListing> {
        let url = self.data_url(version, ITEM_CATALOG);
        let catalog: KeyedCatalog = self.get_json("items.fetch", &url).await?;
        let listing = decode_items(catalog.into_entries(ITEM_CATALOG)?);
        if listing.entries.is_empty() && listing.skipped.is_empty() {
            return Err(CoreError::EmptyCatalog {
                catalog: ITEM_CATALOG,
            });
        }
        debug!(
            count = listing.entries.len(),
            skipped = listing.skipped.len(),
            "item catalog resolved"
        );
        Ok(listing)
    }

    /// Every rune tree and rune icon from `runesReforged.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the document is not a list of
    /// trees, or it contains no trees.
    pub async fn rune_icons(&self, version: &str) -> CoreResult<Vec<RuneEntry>> {
        let url = self.data_url(version, RUNE_CATALOG);
        let trees: Vec<RawRuneTree> = self.get_json("runes.fetch", &url).await?;
        if trees.is_empty() {
            return Err(CoreError::EmptyCatalog {
                catalog: RUNE_CATALOG,
            });
        }
        let mut runes = Vec::new();
        for tree in trees {
            runes.push(RuneEntry {
                key: tree.key,
                icon: tree.icon,
            });
            for rune in tree.slots.into_iter().flat_map(|slot| slot.runes) {
                runes.push(RuneEntry {
                    key: rune.key,
                    icon: rune.icon,
                });
            }
        }
        debug!(count = runes.len(), "rune catalog resolved");
        Ok(runes)
    }

    fn data_url(&self, version: &str, file: &str) -> String {
        format!("{}/cdn/{version}/data/{}/{file}", self.base, self.locale)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
    ) -> CoreResult<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| CoreError::resolution(operation, url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::ResolutionStatus {
                operation,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| CoreError::resolution(operation, url, err))
    }
}

#[async_trait]
impl VersionSource for DataDragonClient {
    async fn latest_version(&self) -> CoreResult<String> {
        Self::latest_version(self).await
    }
}

/// Keep only alphabetic characters of an item display name.
#[must_use]
pub fn sanitize_item_name(name: &str) -> String {
    name.chars().filter(|ch| ch.is_alphabetic()).collect()
}

fn decode_items(data: BTreeMap<String, Value>) -> ItemListing {
    let mut listing = ItemListing::default();
    let mut seen = HashSet::new();
    for (key, value) in data {
        let skip = |reason: &str| SkippedEntry {
            source: ITEM_CATALOG.to_string(),
            key: key.clone(),
            reason: reason.to_string(),
        };
        let Ok(item) = serde_json::from_value::<RawItem>(value) else {
            listing.skipped.push(skip("undecodable_entry"));
            continue;
        };
        let name = sanitize_item_name(&item.name);
        if name.is_empty() {
            listing.skipped.push(skip("empty_name"));
            continue;
        }
        if item.image.full.is_empty() {
            listing.skipped.push(skip("missing_image"));
            continue;
        }
        if !seen.insert(name.clone()) {
            listing.skipped.push(skip("duplicate_name"));
            continue;
        }
        listing.entries.push(ItemEntry {
            key,
            name,
            image: item.image.full,
        });
    }
    listing
}
