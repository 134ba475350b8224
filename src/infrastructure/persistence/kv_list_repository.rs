//! Key-value implementation of list documents.

use async_trait::async_trait;
use std::sync::Arc;

use super::json_document;
use crate::domain::keys;
use crate::domain::repositories::ListRepository;
use crate::error::AppError;
use crate::infrastructure::kv::KvStore;

/// A JSON array stored under a fixed key.
pub struct KvListRepository {
    store: Arc<dyn KvStore>,
    key: &'static str,
}

impl KvListRepository {
    /// The feed registry, under [`keys::FEEDS_LIST`].
    pub fn feeds(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            key: keys::FEEDS_LIST,
        }
    }

    /// The monitored-domain set, under [`keys::MONITORED_DOMAINS_LIST`].
    pub fn monitored_domains(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            key: keys::MONITORED_DOMAINS_LIST,
        }
    }
}

#[async_trait]
impl ListRepository for KvListRepository {
    async fn load(&self) -> Result<Vec<String>, AppError> {
        Ok(json_document::load(self.store.as_ref(), self.key)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, items: &[String]) -> Result<(), AppError> {
        json_document::save(self.store.as_ref(), self.key, items).await
    }

    async fn claim(&self, item: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&keys::list_claim(self.key, item)).await?)
    }

    async fn set_claim(&self, item: &str, token: &str) -> Result<(), AppError> {
        Ok(self.store.put(&keys::list_claim(self.key, item), token).await?)
    }

    async fn clear_claim(&self, item: &str) -> Result<(), AppError> {
        Ok(self.store.delete(&keys::list_claim(self.key, item)).await?)
    }
}
