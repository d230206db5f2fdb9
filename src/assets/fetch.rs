//! Network fetch capability used by the asset store.

use std::future::Future;

use super::error::{AssetError, AssetResult};

/// Fetches the full body at a URL.
pub trait Fetcher: Send + Sync + 'static {
    /// Resolve to the response body, or `FetchFailed` on any transport
    /// error or non-success status.
    fn fetch(&self, url: &str) -> impl Future<Output = AssetResult<Vec<u8>>> + Send;
}

/// `reqwest`-backed fetcher.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
        let failed = |reason: String| AssetError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let body = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        Ok(body.to_vec())
    }
}
