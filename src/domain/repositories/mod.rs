//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence` and sit on
//! top of a [`crate::infrastructure::kv::KvStore`]. Mock implementations are
//! generated via `mockall` for testing.
//!
//! # Available Repositories
//!
//! - [`SnapshotRepository`] - Current, latest and dated snapshots per site
//! - [`ListRepository`] - Feed registry and monitored-domain set documents
//! - [`SearchResultRepository`] - Previous search results per domain

pub mod list_repository;
pub mod search_result_repository;
pub mod snapshot_repository;

pub use list_repository::ListRepository;
pub use search_result_repository::SearchResultRepository;
pub use snapshot_repository::SnapshotRepository;

#[cfg(test)]
pub use list_repository::MockListRepository;
#[cfg(test)]
pub use search_result_repository::MockSearchResultRepository;
#[cfg(test)]
pub use snapshot_repository::MockSnapshotRepository;
