//! Monitoring services.

pub mod change_detector;
pub mod dispatcher;
pub mod domain_monitor;
pub mod feed_registry;
pub mod monitor;
pub mod search_differ;
pub mod shared_list;
pub mod sitemap_resolver;

pub use change_detector::ChangeDetector;
pub use dispatcher::Dispatcher;
pub use domain_monitor::DomainMonitor;
pub use feed_registry::FeedRegistry;
pub use monitor::Monitor;
pub use search_differ::SearchDiffer;
pub use sitemap_resolver::SitemapResolver;
