//! Repository trait for list documents.

use crate::error::AppError;
use async_trait::async_trait;

/// An ordered list of strings stored as one document.
///
/// Backs both the feed registry and the monitored-domain set. There is no
/// compare-and-swap: `save` blindly replaces whatever another caller wrote in
/// between, so callers re-read to verify (see
/// [`crate::application::services::shared_list`]). Per-item claim tokens let
/// concurrent inserters of the same item agree on which of them added it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::KvListRepository`] - Key-value implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Reads the list. A missing document is an empty list.
    async fn load(&self) -> Result<Vec<String>, AppError>;

    /// Replaces the whole list.
    async fn save(&self, items: &[String]) -> Result<(), AppError>;

    /// Reads the claim token last written for `item`.
    async fn claim(&self, item: &str) -> Result<Option<String>, AppError>;

    /// Overwrites the claim token of `item`.
    async fn set_claim(&self, item: &str, token: &str) -> Result<(), AppError>;

    /// Drops the claim token of `item`. Missing tokens are fine.
    async fn clear_claim(&self, item: &str) -> Result<(), AppError>;
}
