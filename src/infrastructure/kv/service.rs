//! Key-value store trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),
    #[error("Store operation error: {0}")]
    Operation(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal key-value interface shared by every persisted component.
///
/// Only `get`, `put` and `delete` are available. There is no compare-and-swap
/// and no transaction, and a value written by one caller may not be visible to
/// another caller right away. Multi-step mutations must therefore re-read and
/// verify (see [`crate::application::services::DomainMonitor`]).
///
/// Unlike a cache, failures are propagated: callers retry on them.
///
/// # Implementations
///
/// - [`crate::infrastructure::kv::RedisKvStore`] - Redis-backed store
/// - [`crate::infrastructure::kv::MemoryKvStore`] - In-process store for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads a value. `Ok(None)` means the key is absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes a key. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Checks if the backend is reachable.
    ///
    /// Used by the health endpoint.
    async fn health_check(&self) -> bool;
}
