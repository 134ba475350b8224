//! Key-value implementation of the snapshot repository.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::SnapshotKind;
use crate::domain::keys;
use crate::domain::repositories::SnapshotRepository;
use crate::error::AppError;
use crate::infrastructure::kv::KvStore;

/// Stores each snapshot kind under its own key (see [`crate::domain::keys`]).
pub struct KvSnapshotRepository {
    store: Arc<dyn KvStore>,
}

impl KvSnapshotRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn key(domain: &str, kind: SnapshotKind) -> String {
        match kind {
            SnapshotKind::Current => keys::snapshot_current(domain),
            SnapshotKind::Latest => keys::snapshot_latest(domain),
            SnapshotKind::Dated(date) => keys::snapshot_dated(domain, date),
        }
    }
}

#[async_trait]
impl SnapshotRepository for KvSnapshotRepository {
    async fn get(&self, domain: &str, kind: SnapshotKind) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&Self::key(domain, kind)).await?)
    }

    async fn put(
        &self,
        domain: &str,
        kind: SnapshotKind,
        document: &str,
    ) -> Result<(), AppError> {
        self.store.put(&Self::key(domain, kind), document).await?;
        Ok(())
    }

    async fn set_last_update(&self, domain: &str, timestamp: &str) -> Result<(), AppError> {
        self.store.put(&keys::last_update(domain), timestamp).await?;
        Ok(())
    }

    async fn last_update(&self, domain: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&keys::last_update(domain)).await?)
    }
}
