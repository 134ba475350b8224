//! Application layer services implementing the monitoring logic.
//!
//! Services are generic over the repository and client traits of the domain
//! and infrastructure layers, so tests can swap in mocks or the in-memory
//! store.
//!
//! # Available Services
//!
//! - [`services::sitemap_resolver::SitemapResolver`] - Recursive sitemap fetching
//! - [`services::change_detector::ChangeDetector`] - Snapshot diffing and rotation
//! - [`services::feed_registry::FeedRegistry`] - Registered root sitemaps
//! - [`services::domain_monitor::DomainMonitor`] - Search-monitored domains
//! - [`services::search_differ::SearchDiffer`] - New search results per domain
//! - [`services::dispatcher::Dispatcher`] - Fan-out to notification transports
//! - [`services::monitor::Monitor`] - Runs, status and test messages

pub mod services;
