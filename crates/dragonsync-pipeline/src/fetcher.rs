//! Single-asset retrieval.
//!
//! # Design
//! - One GET per descriptor, bounded by the client timeout; no retries.
//! - The whole body is buffered in memory before it is handed on.
//! - The trait seam lets tests inject failures and delays without a server.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dragonsync_core::AssetDescriptor;
use reqwest::Client;

use crate::error::{FetchError, FetchResult, PipelineError, PipelineResult};

/// Retrieves the payload behind a descriptor's source URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the full payload for `descriptor`.
    async fn fetch(&self, descriptor: &AssetDescriptor) -> FetchResult<Bytes>;
}

/// [`AssetFetcher`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| PipelineError::Client { source })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, descriptor: &AssetDescriptor) -> FetchResult<Bytes> {
        let url = descriptor.source_url();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}
