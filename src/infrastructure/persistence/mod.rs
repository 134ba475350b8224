//! Key-value repository implementations.
//!
//! Concrete implementations of the domain repository traits on top of any
//! [`crate::infrastructure::kv::KvStore`]. Lists and search results are stored
//! as JSON documents; snapshots as canonical sitemap XML.
//!
//! # Repositories
//!
//! - [`KvSnapshotRepository`] - Current, latest and dated snapshots
//! - [`KvListRepository`] - Feed registry and monitored-domain set
//! - [`KvSearchResultRepository`] - Search results and last-check markers

mod json_document;
pub mod kv_list_repository;
pub mod kv_search_result_repository;
pub mod kv_snapshot_repository;

pub use kv_list_repository::KvListRepository;
pub use kv_search_result_repository::KvSearchResultRepository;
pub use kv_snapshot_repository::KvSnapshotRepository;
