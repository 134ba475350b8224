//! Run orchestration: scheduled sitemap checks, search monitoring, status.

use std::time::Duration;

use super::dispatcher::Dispatcher;
use super::domain_monitor::DomainMonitor;
use super::feed_registry::FeedRegistry;
use super::search_differ::SearchDiffer;
use crate::config::MonitorConfig;
use crate::domain::entities::{
    AlertLevel, DispatchResult, Feed, FeedStatus, MonitorStatus, NotificationPayload, RunItem,
    RunKind, RunReport, Snapshot, SnapshotKind,
};
use crate::domain::repositories::{ListRepository, SearchResultRepository, SnapshotRepository};
use crate::error::AppError;
use crate::infrastructure::http::{SearchClient, SitemapFetcher};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Drives the services through one run at a time.
///
/// Feeds and domains are processed sequentially with a pause between items;
/// within an item, delivery to the transports is concurrent. One failing
/// item never stops the run.
pub struct Monitor<F, L, S, R, C>
where
    F: SitemapFetcher,
    L: ListRepository,
    S: SnapshotRepository,
    R: SearchResultRepository,
    C: SearchClient,
{
    feeds: FeedRegistry<F, L, S>,
    domains: DomainMonitor<L, R>,
    search: SearchDiffer<C, R>,
    dispatcher: Dispatcher,
    feed_delay: Duration,
    search_domain_delay: Duration,
}

impl<F, L, S, R, C> Monitor<F, L, S, R, C>
where
    F: SitemapFetcher,
    L: ListRepository,
    S: SnapshotRepository,
    R: SearchResultRepository,
    C: SearchClient,
{
    pub fn new(
        feeds: FeedRegistry<F, L, S>,
        domains: DomainMonitor<L, R>,
        search: SearchDiffer<C, R>,
        dispatcher: Dispatcher,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            feeds,
            domains,
            search,
            dispatcher,
            feed_delay: config.feed_delay,
            search_domain_delay: config.search_domain_delay,
        }
    }

    pub fn feeds(&self) -> &FeedRegistry<F, L, S> {
        &self.feeds
    }

    pub fn domains(&self) -> &DomainMonitor<L, R> {
        &self.domains
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Refreshes every registered feed and notifies about new URLs.
    ///
    /// Each feed with new URLs gets its own update message; when the run found
    /// anything at all, a digest across all feeds follows at the end.
    ///
    /// # Errors
    ///
    /// Only fails if the feed list itself cannot be read. Per-feed failures
    /// are recorded in the report.
    pub async fn run_scheduled(&self) -> Result<RunReport, AppError> {
        let started_at = Utc::now().to_rfc3339();
        let feeds = self.feeds.list().await?;
        info!(feeds = feeds.len(), "Scheduled run started");

        let mut items = Vec::with_capacity(feeds.len());
        let mut all_new = Vec::new();

        for (index, url) in feeds.iter().enumerate() {
            if index > 0 {
                pause(self.feed_delay).await;
            }

            match self.feeds.refresh(url).await {
                Ok(refresh) => {
                    let mut item = RunItem::completed(url, refresh.new_urls.len());

                    if refresh.new_urls.is_empty() {
                        debug!(url, "No new URLs");
                    } else {
                        let payload =
                            NotificationPayload::sitemap_update(&refresh.domain, &refresh.new_urls);
                        item.dispatch = Some(self.dispatcher.dispatch(&payload).await);
                        all_new.extend(refresh.new_urls);
                    }
                    items.push(item);
                }
                Err(AppError::NotFound { .. }) => {
                    debug!(url, "Feed removed during run, skipped");
                }
                Err(e) => {
                    warn!(url, error = %e, "Feed check failed");
                    items.push(RunItem::failed(url, &e));
                }
            }
        }

        let digest = if all_new.is_empty() {
            None
        } else {
            Some(
                self.dispatcher
                    .dispatch(&NotificationPayload::digest(&all_new))
                    .await,
            )
        };

        let report = RunReport {
            kind: RunKind::Sitemap,
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            total_new: all_new.len(),
            items,
            digest,
        };

        info!(
            feeds = report.items.len(),
            failed = report.failed_count(),
            new_urls = report.total_new,
            "Scheduled run finished"
        );
        Ok(report)
    }

    /// Searches every monitored domain and notifies about unseen results.
    ///
    /// # Errors
    ///
    /// Only fails if the domain list cannot be read.
    pub async fn run_search_monitor(&self) -> Result<RunReport, AppError> {
        let started_at = Utc::now().to_rfc3339();
        let domains = self.domains.list().await?;

        if !self.search.is_configured() {
            warn!("Search API key not configured, search results will be empty");
        }
        info!(domains = domains.len(), "Search monitor run started");

        let mut items = Vec::with_capacity(domains.len());
        let mut total_new = 0;

        for (index, domain) in domains.iter().enumerate() {
            if index > 0 {
                pause(self.search_domain_delay).await;
            }

            match self.search.refresh_domain(domain).await {
                Ok(fresh) => {
                    let mut item = RunItem::completed(domain, fresh.len());
                    if !fresh.is_empty() {
                        let payload = NotificationPayload::search_update(domain, &fresh);
                        item.dispatch = Some(self.dispatcher.dispatch(&payload).await);
                        total_new += fresh.len();
                    }
                    items.push(item);
                }
                Err(e) => {
                    warn!(domain, error = %e, "Search check failed");
                    items.push(RunItem::failed(domain, &e));
                }
            }
        }

        let report = RunReport {
            kind: RunKind::Search,
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            items,
            total_new,
            digest: None,
        };

        info!(
            domains = report.items.len(),
            failed = report.failed_count(),
            new_results = report.total_new,
            "Search monitor run finished"
        );
        Ok(report)
    }

    pub async fn status(&self) -> Result<MonitorStatus, AppError> {
        let mut feeds = Vec::new();
        for url in self.feeds.list().await? {
            let domain = match Feed::parse(&url) {
                Ok(feed) => feed.domain,
                Err(_) => String::new(),
            };
            let last_update = if domain.is_empty() {
                None
            } else {
                self.feeds.detector().last_update(&domain).await?
            };
            feeds.push(FeedStatus {
                url,
                domain,
                last_update,
            });
        }

        Ok(MonitorStatus {
            feeds,
            domains: self.domains.list_with_last_check().await?,
            channels: self.dispatcher.channels(),
            search_configured: self.search.is_configured(),
        })
    }

    /// Sends a status message through every enabled channel.
    pub async fn send_test_message(&self) -> DispatchResult {
        let message = format!(
            "Test message from site-bot {} at {}",
            env!("CARGO_PKG_VERSION"),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        self.dispatcher
            .dispatch(&NotificationPayload::status(AlertLevel::Info, message))
            .await
    }

    pub async fn snapshot(&self, domain: &str, kind: SnapshotKind) -> Result<Snapshot, AppError> {
        self.feeds.detector().snapshot(domain, kind).await
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{ChangeDetector, SitemapResolver};
    use crate::domain::entities::SearchResultItem;
    use crate::domain::repositories::{
        MockListRepository, MockSearchResultRepository, MockSnapshotRepository,
    };
    use crate::infrastructure::http::{FetchError, MockSearchClient, MockSitemapFetcher};
    use crate::infrastructure::transports::{Transport, TransportError, TransportMessage};
    use crate::utils::retry::RetryPolicy;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        subjects: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn render(&self, payload: &NotificationPayload) -> TransportMessage {
            TransportMessage {
                subject: payload.title(),
                body: json!({}),
            }
        }

        async fn send(&self, message: &TransportMessage) -> Result<(), TransportError> {
            self.subjects.lock().unwrap().push(message.subject.clone());
            Ok(())
        }
    }

    fn fixed_list(items: &[&str]) -> MockListRepository {
        let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let mut list = MockListRepository::new();
        list.expect_load().returning(move || Ok(items.clone()));
        list.expect_save().returning(|_| Ok(()));
        list
    }

    fn monitor(
        fetcher: MockSitemapFetcher,
        feeds: MockListRepository,
        domains: MockListRepository,
        search: MockSearchClient,
        results: MockSearchResultRepository,
        recorder: Arc<Recorder>,
    ) -> Monitor<
        MockSitemapFetcher,
        MockListRepository,
        MockSnapshotRepository,
        MockSearchResultRepository,
        MockSearchClient,
    > {
        let mut snapshots = MockSnapshotRepository::new();
        snapshots.expect_get().returning(|_, _| Ok(None));
        snapshots.expect_put().returning(|_, _, _| Ok(()));
        snapshots.expect_set_last_update().returning(|_, _| Ok(()));

        let results = Arc::new(results);
        let config = MonitorConfig {
            feed_delay: Duration::ZERO,
            search_domain_delay: Duration::ZERO,
            ..MonitorConfig::default()
        };

        Monitor::new(
            FeedRegistry::new(
                SitemapResolver::new(Arc::new(fetcher), Duration::ZERO),
                ChangeDetector::new(Arc::new(snapshots)),
                Arc::new(feeds),
                3,
            )
            .with_policies(RetryPolicy::immediate(5), RetryPolicy::immediate(10)),
            DomainMonitor::new(Arc::new(domains), results.clone()),
            SearchDiffer::new(Arc::new(search), results),
            Dispatcher::new(vec![recorder]),
            &config,
        )
    }

    #[tokio::test]
    async fn test_scheduled_run_isolates_failing_feed() {
        let mut fetcher = MockSitemapFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            if url.starts_with("https://down.com") {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 503,
                })
            } else {
                Ok("<urlset><url><loc>https://a.com/guide-one</loc></url></urlset>".to_string())
            }
        });

        let recorder = Arc::new(Recorder::default());
        let monitor = monitor(
            fetcher,
            fixed_list(&["https://down.com/sitemap.xml", "https://a.com/sitemap.xml"]),
            fixed_list(&[]),
            MockSearchClient::new(),
            MockSearchResultRepository::new(),
            recorder.clone(),
        );

        let report = monitor.run_scheduled().await.unwrap();

        assert_eq!(report.items.len(), 2);
        assert!(!report.items[0].success);
        assert_eq!(report.items[0].error.as_ref().unwrap().code, "fetch_error");
        assert!(report.items[1].success);
        assert_eq!(report.total_new, 1);
        assert!(report.digest.is_some());

        let subjects = recorder.subjects.lock().unwrap();
        assert_eq!(subjects.len(), 2);
        assert!(subjects[0].starts_with("a.com: 1 new page"));
        assert!(subjects[1].starts_with("Digest:"));
    }

    #[tokio::test]
    async fn test_scheduled_run_skips_feed_removed_mid_run() {
        let mut fetcher = MockSitemapFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url.starts_with("https://a.com"))
            .times(1)
            .returning(|_| Ok("<urlset><url><loc>https://a.com/p1</loc></url></urlset>".to_string()));

        // the run reads both feeds; b.com is removed before its turn
        let mut feeds = MockListRepository::new();
        let mut loads = 0;
        feeds.expect_load().returning(move || {
            loads += 1;
            let mut items = vec!["https://a.com/sitemap.xml".to_string()];
            if loads == 1 {
                items.push("https://b.com/sitemap.xml".to_string());
            }
            Ok(items)
        });
        feeds.expect_save().never();
        feeds.expect_set_claim().never();

        let recorder = Arc::new(Recorder::default());
        let monitor = monitor(
            fetcher,
            feeds,
            fixed_list(&[]),
            MockSearchClient::new(),
            MockSearchResultRepository::new(),
            recorder.clone(),
        );

        let report = monitor.run_scheduled().await.unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].target, "https://a.com/sitemap.xml");
        assert_eq!(report.total_new, 1);
    }

    #[tokio::test]
    async fn test_search_run_dispatches_only_new_results() {
        let mut search = MockSearchClient::new();
        search.expect_is_configured().return_const(true);
        search.expect_search_domain().returning(|domain| {
            Ok(vec![SearchResultItem::new(
                format!("https://{}/new", domain),
                "New",
            )])
        });

        let mut results = MockSearchResultRepository::new();
        results.expect_load().returning(|domain| {
            if domain == "seen.com" {
                Ok(vec![SearchResultItem::new("https://seen.com/new", "New")])
            } else {
                Ok(vec![])
            }
        });
        results.expect_save().returning(|_, _| Ok(()));
        results.expect_set_last_check().returning(|_, _| Ok(()));

        let recorder = Arc::new(Recorder::default());
        let monitor = monitor(
            MockSitemapFetcher::new(),
            fixed_list(&[]),
            fixed_list(&["seen.com", "fresh.com"]),
            search,
            results,
            recorder.clone(),
        );

        let report = monitor.run_search_monitor().await.unwrap();

        assert_eq!(report.kind, RunKind::Search);
        assert_eq!(report.total_new, 1);
        assert!(report.items[0].dispatch.is_none());
        assert!(report.items[1].dispatch.is_some());
        assert_eq!(recorder.subjects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_run_sends_nothing() {
        let recorder = Arc::new(Recorder::default());
        let monitor = monitor(
            MockSitemapFetcher::new(),
            fixed_list(&[]),
            fixed_list(&[]),
            MockSearchClient::new(),
            MockSearchResultRepository::new(),
            recorder.clone(),
        );

        let report = monitor.run_scheduled().await.unwrap();

        assert!(report.items.is_empty());
        assert!(report.digest.is_none());
        assert!(recorder.subjects.lock().unwrap().is_empty());
    }
}
