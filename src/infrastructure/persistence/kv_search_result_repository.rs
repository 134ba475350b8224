//! Key-value implementation of the search result repository.

use async_trait::async_trait;
use std::sync::Arc;

use super::json_document;
use crate::domain::entities::SearchResultItem;
use crate::domain::keys;
use crate::domain::repositories::SearchResultRepository;
use crate::error::AppError;
use crate::infrastructure::kv::KvStore;

pub struct KvSearchResultRepository {
    store: Arc<dyn KvStore>,
}

impl KvSearchResultRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SearchResultRepository for KvSearchResultRepository {
    async fn load(&self, domain: &str) -> Result<Vec<SearchResultItem>, AppError> {
        Ok(
            json_document::load(self.store.as_ref(), &keys::search_results(domain))
                .await?
                .unwrap_or_default(),
        )
    }

    async fn save(&self, domain: &str, items: &[SearchResultItem]) -> Result<(), AppError> {
        json_document::save(self.store.as_ref(), &keys::search_results(domain), items).await
    }

    async fn set_last_check(&self, domain: &str, timestamp: &str) -> Result<(), AppError> {
        self.store
            .put(&keys::search_last_check(domain), timestamp)
            .await?;
        Ok(())
    }

    async fn last_check(&self, domain: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&keys::search_last_check(domain)).await?)
    }

    async fn clear(&self, domain: &str) -> Result<(), AppError> {
        self.store.delete(&keys::search_results(domain)).await?;
        self.store.delete(&keys::search_last_check(domain)).await?;
        Ok(())
    }
}
