//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for storage, outbound HTTP and notifications.
//!
//! # Modules
//!
//! - [`kv`] - Key-value store abstraction (Redis and in-memory implementations)
//! - [`persistence`] - Repositories stored as JSON documents in the key-value store
//! - [`http`] - Sitemap fetching and the search API client
//! - [`transports`] - Notification channels

pub mod http;
pub mod kv;
pub mod persistence;
pub mod transports;
