//! Sitemap document fetching.

use super::{FetchError, build_client};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches a URL and returns the response body as text.
///
/// A non-success status is an error; the body of such a response is never
/// treated as a sitemap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SitemapFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`SitemapFetcher`] backed by `reqwest`.
///
/// The only timeout is the client's own request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl SitemapFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(url, bytes = body.len(), "Fetched sitemap document");
        Ok(body)
    }
}
