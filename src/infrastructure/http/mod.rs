//! Outbound HTTP: sitemap fetching and the search API.
//!
//! - [`SitemapFetcher`] / [`HttpFetcher`] - GET a sitemap document as text
//! - [`SearchClient`] / [`SerperClient`] - Domain-scoped web search

mod fetcher;
mod search_client;

pub use fetcher::{HttpFetcher, SitemapFetcher};
pub use search_client::{SERPER_ENDPOINT, SearchClient, SerperClient};

#[cfg(test)]
pub use fetcher::MockSitemapFetcher;
#[cfg(test)]
pub use search_client::MockSearchClient;

use crate::error::AppError;
use serde_json::json;
use thiserror::Error;

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; SiteBot/1.0)";

/// Failure talking to a remote site or API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    pub(crate) fn request(url: &str, e: impl std::fmt::Display) -> Self {
        FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        let details = match &e {
            FetchError::Status { url, status } => json!({ "url": url, "status": status }),
            FetchError::Request { url, reason } | FetchError::Decode { url, reason } => {
                json!({ "url": url, "reason": reason })
            }
        };
        AppError::fetch(e.to_string(), details)
    }
}

pub(crate) fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::request("<client>", e))
}
