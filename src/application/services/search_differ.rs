//! Search-result diffing per monitored domain.

use std::sync::Arc;

use crate::domain::entities::{SearchResultItem, new_items};
use crate::domain::repositories::SearchResultRepository;
use crate::error::AppError;
use crate::infrastructure::http::SearchClient;
use chrono::Utc;
use tracing::{debug, info};

/// Finds search results for a domain that were not returned last time.
pub struct SearchDiffer<C: SearchClient, R: SearchResultRepository> {
    client: Arc<C>,
    results: Arc<R>,
}

impl<C: SearchClient, R: SearchResultRepository> SearchDiffer<C, R> {
    pub fn new(client: Arc<C>, results: Arc<R>) -> Self {
        Self { client, results }
    }

    /// Searches `domain`, stores the results and returns the new ones.
    ///
    /// The stored list is replaced, not merged. An empty response (including
    /// the unconfigured-client case) only updates the last-check marker and
    /// keeps the previous list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Fetch`] if the search API call fails; nothing is
    /// written in that case.
    pub async fn refresh_domain(&self, domain: &str) -> Result<Vec<SearchResultItem>, AppError> {
        let current = self.client.search_domain(domain).await?;
        let checked_at = Utc::now().to_rfc3339();

        if current.is_empty() {
            debug!(domain, "No search results");
            self.results.set_last_check(domain, &checked_at).await?;
            return Ok(Vec::new());
        }

        let previous = self.results.load(domain).await?;
        let fresh = new_items(&previous, &current);

        self.results.save(domain, &current).await?;
        self.results.set_last_check(domain, &checked_at).await?;

        info!(
            domain,
            results = current.len(),
            new_results = fresh.len(),
            "Search results refreshed"
        );
        Ok(fresh)
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }
}
