//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod domains;
pub mod feeds;
pub mod health;
pub mod monitor;
pub mod snapshots;

pub use domains::{add_domains_handler, domain_list_handler, remove_domains_handler};
pub use feeds::{add_feed_handler, feed_list_handler, remove_feed_handler};
pub use health::health_handler;
pub use monitor::{
    run_monitor_handler, run_search_handler, status_handler, test_notification_handler,
};
pub use snapshots::snapshot_handler;
