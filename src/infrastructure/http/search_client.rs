//! Search API client used to discover new pages of monitored domains.

use super::{FetchError, build_client};
use crate::domain::entities::SearchResultItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// Domain-scoped web search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns recent organic results for pages on `domain`.
    async fn search_domain(&self, domain: &str) -> Result<Vec<SearchResultItem>, FetchError>;

    /// False when no credential is configured and searches return nothing.
    fn is_configured(&self) -> bool;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: String,
    tbs: &'a str,
    num: u32,
    page: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    link: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    date: Option<String>,
    position: Option<u32>,
}

impl OrganicResult {
    /// `None` for results without a link; they cannot be tracked.
    fn into_item(self) -> Option<SearchResultItem> {
        let url = self.link.filter(|l| !l.trim().is_empty())?;
        Some(SearchResultItem {
            url,
            title: self.title,
            snippet: self.snippet,
            date: self.date,
            position: self.position,
        })
    }
}

/// Serper.dev client restricted to the past day (`tbs=qdr:d`).
///
/// Without an API key every search returns an empty list instead of failing.
pub struct SerperClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl SerperClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: SERPER_ENDPOINT.to_string(),
        })
    }

    /// Overrides the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchClient for SerperClient {
    async fn search_domain(&self, domain: &str) -> Result<Vec<SearchResultItem>, FetchError> {
        let Some(api_key) = &self.api_key else {
            warn!(domain, "SERPER_API_KEY not set, returning empty search results");
            return Ok(Vec::new());
        };

        let request = SearchRequest {
            q: format!("site:{}", domain),
            tbs: "qdr:d",
            num: 100,
            page: 1,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FetchError::request(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| FetchError::Decode {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let received = body.organic.len();
        let items: Vec<SearchResultItem> = body
            .organic
            .into_iter()
            .filter_map(OrganicResult::into_item)
            .collect();
        if items.len() < received {
            debug!(domain, skipped = received - items.len(), "Results without link skipped");
        }
        debug!(domain, results = items.len(), "Search completed");
        Ok(items)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
