//! Key-value storage backends.
//!
//! Provides a [`KvStore`] trait with two implementations:
//! - [`RedisKvStore`] - Production Redis-backed store
//! - [`MemoryKvStore`] - In-process store for development and testing

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryKvStore;
pub use redis_store::RedisKvStore;
pub use service::{KvStore, StoreError, StoreResult};

#[cfg(test)]
pub use service::MockKvStore;

use crate::error::AppError;
use serde_json::json;

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::internal("Storage error", json!({ "reason": e.to_string() }))
    }
}
