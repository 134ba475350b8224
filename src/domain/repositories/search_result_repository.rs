//! Repository trait for per-domain search results.

use crate::domain::entities::SearchResultItem;
use crate::error::AppError;
use async_trait::async_trait;

/// Previous search results and the last-check marker of each monitored domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchResultRepository: Send + Sync {
    /// Results of the previous check. Empty if the domain was never checked.
    async fn load(&self, domain: &str) -> Result<Vec<SearchResultItem>, AppError>;

    /// Replaces the stored results.
    async fn save(&self, domain: &str, items: &[SearchResultItem]) -> Result<(), AppError>;

    async fn set_last_check(&self, domain: &str, timestamp: &str) -> Result<(), AppError>;

    async fn last_check(&self, domain: &str) -> Result<Option<String>, AppError>;

    /// Deletes the results and the last-check marker.
    async fn clear(&self, domain: &str) -> Result<(), AppError>;
}
