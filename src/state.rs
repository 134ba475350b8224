//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    ChangeDetector, Dispatcher, DomainMonitor, FeedRegistry, Monitor, SearchDiffer,
    SitemapResolver,
};
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::http::{HttpFetcher, SerperClient};
use crate::infrastructure::kv::KvStore;
use crate::infrastructure::persistence::{
    KvListRepository, KvSearchResultRepository, KvSnapshotRepository,
};
use crate::infrastructure::transports::{self, Transport};

/// The monitor wired to the production backends.
pub type AppMonitor = Monitor<
    HttpFetcher,
    KvListRepository,
    KvSnapshotRepository,
    KvSearchResultRepository,
    SerperClient,
>;

/// State injected into every handler.
///
/// Cheap to clone; all services are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<AppMonitor>,
    pub store: Arc<dyn KvStore>,
    /// Pause between items of a batch request.
    pub batch_delay: Duration,
}

impl AppState {
    pub fn new(monitor: Arc<AppMonitor>, store: Arc<dyn KvStore>, batch_delay: Duration) -> Self {
        Self {
            monitor,
            store,
            batch_delay,
        }
    }

    /// Builds all services from `config` on top of `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn build(config: &Config, store: Arc<dyn KvStore>) -> Result<Self, AppError> {
        let timeout = config.http_timeout();
        let transports = transports::from_config(&config.notifications, timeout)?;
        let search = SerperClient::new(config.serper_api_key.clone(), timeout)?;

        let monitor = build_monitor(
            config,
            store.clone(),
            HttpFetcher::new(timeout)?,
            search,
            transports,
        );

        Ok(Self::new(
            Arc::new(monitor),
            store,
            config.monitor.batch_delay,
        ))
    }
}

/// Wires the services over `store` with the given outbound clients.
pub fn build_monitor(
    config: &Config,
    store: Arc<dyn KvStore>,
    fetcher: HttpFetcher,
    search: SerperClient,
    transports: Vec<Arc<dyn Transport>>,
) -> AppMonitor {
    let snapshots = Arc::new(KvSnapshotRepository::new(store.clone()));
    let feeds = Arc::new(KvListRepository::feeds(store.clone()));
    let domains = Arc::new(KvListRepository::monitored_domains(store.clone()));
    let results = Arc::new(KvSearchResultRepository::new(store));

    let registry = FeedRegistry::new(
        SitemapResolver::new(Arc::new(fetcher), config.monitor.child_fetch_delay),
        ChangeDetector::new(snapshots),
        feeds,
        config.monitor.max_depth,
    );

    Monitor::new(
        registry,
        DomainMonitor::new(domains, results.clone()),
        SearchDiffer::new(Arc::new(search), results),
        Dispatcher::new(transports),
        &config.monitor,
    )
}
