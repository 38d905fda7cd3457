//! `httpmock`-backed stand-in for the Data Dragon CDN.
//!
//! Catalog bodies mirror the shape of the real documents but carry only the
//! fields the resolvers read.

use httpmock::{Mock, MockServer};
use httpmock::prelude::*;
use serde_json::{Value, json};

/// Item entry served by [`FakeDataDragon::mock_items`].
#[derive(Debug, Clone, Copy)]
pub struct FakeItem<'a> {
    /// Catalog key.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Image file name under `img/item/`.
    pub image: &'a str,
}

/// Rune tree served by [`FakeDataDragon::mock_runes`].
#[derive(Debug, Clone)]
pub struct FakeRuneTree<'a> {
    /// Tree key.
    pub key: &'a str,
    /// Tree icon path under `cdn/img/`.
    pub icon: &'a str,
    /// `(key, icon)` for every rune in the tree.
    pub runes: Vec<(&'a str, &'a str)>,
}

/// Mock server answering version, catalog and image requests.
pub struct FakeDataDragon {
    server: MockServer,
    version: String,
    locale: String,
}

impl FakeDataDragon {
    /// Start a server that reports `version` as the newest patch.
    pub async fn start(version: &str) -> Self {
        Self {
            server: MockServer::start_async().await,
            version: version.to_string(),
            locale: "en_US".to_string(),
        }
    }

    /// Base URL to configure as the Data Dragon root.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.base_url()
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    /// Patch served by [`Self::mock_versions`].
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Underlying server for ad-hoc mocks.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Serve `api/versions.json` with the current patch first.
    pub fn mock_versions(&self) -> Mock<'_> {
        let body = json!([self.version, "0.0.1"]);
        self.mock_json("/api/versions.json", body)
    }

    /// Serve `api/versions.json` with `status` and no body.
    pub fn mock_versions_status(&self, status: u16) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path("/api/versions.json");
            then.status(status);
        })
    }

    /// Serve `champion.json` listing `names`.
    pub fn mock_champions(&self, names: &[&str]) -> Mock<'_> {
        let data: serde_json::Map<String, Value> = names
            .iter()
            .map(|name| ((*name).to_string(), json!({ "id": name, "name": name })))
            .collect();
        let body = json!({ "type": "champion", "version": self.version, "data": data });
        self.mock_json(&self.data_path("champion.json"), body)
    }

    /// Serve `item.json` with `items`.
    pub fn mock_items(&self, items: &[FakeItem<'_>]) -> Mock<'_> {
        let data: serde_json::Map<String, Value> = items
            .iter()
            .map(|item| {
                (
                    item.id.to_string(),
                    json!({ "name": item.name, "image": { "full": item.image } }),
                )
            })
            .collect();
        self.mock_items_raw(json!({ "type": "item", "version": self.version, "data": data }))
    }

    /// Serve `item.json` with an arbitrary body.
    pub fn mock_items_raw(&self, body: Value) -> Mock<'_> {
        self.mock_json(&self.data_path("item.json"), body)
    }

    /// Serve `runesReforged.json` with `trees`.
    pub fn mock_runes(&self, trees: &[FakeRuneTree<'_>]) -> Mock<'_> {
        let body: Vec<Value> = trees
            .iter()
            .map(|tree| {
                let runes: Vec<Value> = tree
                    .runes
                    .iter()
                    .map(|(key, icon)| json!({ "key": key, "icon": icon }))
                    .collect();
                json!({ "key": tree.key, "icon": tree.icon, "slots": [{ "runes": runes }] })
            })
            .collect();
        self.mock_json(&self.data_path("runesReforged.json"), Value::Array(body))
    }

    /// Answer `file` under the versioned data directory with `status`.
    pub fn mock_data_status(&self, file: &str, status: u16) -> Mock<'_> {
        let path = self.data_path(file);
        self.server.mock(move |when, then| {
            when.method(GET).path(path.as_str());
            then.status(status);
        })
    }

    /// Serve `body` as an image at `path`.
    pub fn mock_image(&self, path: &str, body: &[u8]) -> Mock<'_> {
        let body = body.to_vec();
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "image/png")
                .body(body);
        })
    }

    /// Answer `path` with `404 Not Found`.
    pub fn mock_missing(&self, path: &str) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(404);
        })
    }

    fn data_path(&self, file: &str) -> String {
        format!("/cdn/{}/data/{}/{file}", self.version, self.locale)
    }

    fn mock_json(&self, path: &str, body: Value) -> Mock<'_> {
        self.server.mock(move |when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body);
        })
    }
}
