//! Registry of monitored root sitemaps.

use std::sync::Arc;

use super::change_detector::ChangeDetector;
use super::shared_list::{self, Removed};
use super::sitemap_resolver::SitemapResolver;
use crate::domain::entities::{ChangeOutcome, Feed, FeedRefresh};
use crate::domain::repositories::{ListRepository, SnapshotRepository};
use crate::error::AppError;
use crate::infrastructure::http::SitemapFetcher;
use crate::utils::retry::RetryPolicy;
use serde_json::json;
use tracing::info;

/// Registers root sitemaps, fail-closed: a feed is stored only after it
/// resolved and its snapshot was committed.
pub struct FeedRegistry<F, L, S>
where
    F: SitemapFetcher,
    L: ListRepository,
    S: SnapshotRepository,
{
    resolver: SitemapResolver<F>,
    detector: ChangeDetector<S>,
    feeds: Arc<L>,
    max_depth: usize,
    insert_policy: RetryPolicy,
    remove_policy: RetryPolicy,
}

impl<F, L, S> FeedRegistry<F, L, S>
where
    F: SitemapFetcher,
    L: ListRepository,
    S: SnapshotRepository,
{
    pub fn new(
        resolver: SitemapResolver<F>,
        detector: ChangeDetector<S>,
        feeds: Arc<L>,
        max_depth: usize,
    ) -> Self {
        Self {
            resolver,
            detector,
            feeds,
            max_depth,
            insert_policy: RetryPolicy::for_list_insert(),
            remove_policy: RetryPolicy::for_list_removal(),
        }
    }

    /// Replaces the retry policies of registry writes.
    pub fn with_policies(mut self, insert: RetryPolicy, remove: RetryPolicy) -> Self {
        self.insert_policy = insert;
        self.remove_policy = remove;
        self
    }

    /// Resolves `url`, commits its snapshot, then registers it.
    ///
    /// Adding a registered URL re-runs resolution and diffing, which is how a
    /// refresh is forced.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL
    /// - [`AppError::Fetch`] if the root sitemap cannot be fetched; the feed
    ///   is not registered
    /// - [`AppError::Conflict`] if the registry write does not converge
    pub async fn add(&self, url: &str) -> Result<FeedRefresh, AppError> {
        let feed = Feed::parse(url)?;
        let (url_count, outcome) = self.resolve_and_commit(&feed).await?;

        let inserted =
            shared_list::insert(self.feeds.as_ref(), &feed.url, &self.insert_policy, "feed_add")
                .await?;
        let newly_registered = inserted == shared_list::Inserted::Added;

        if newly_registered {
            info!(url = %feed.url, domain = %feed.domain, "Feed registered");
        }

        Ok(FeedRefresh::new(feed, url_count, outcome, newly_registered))
    }

    /// Resolves and diffs a registered feed without touching the registry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if `url` is no longer registered; nothing is
    ///   fetched
    /// - [`AppError::Fetch`] if the root sitemap cannot be fetched
    pub async fn refresh(&self, url: &str) -> Result<FeedRefresh, AppError> {
        let feed = Feed::parse(url)?;

        if !self.feeds.load().await?.iter().any(|f| *f == feed.url) {
            return Err(AppError::not_found(
                "Feed not registered",
                json!({ "url": feed.url }),
            ));
        }

        let (url_count, outcome) = self.resolve_and_commit(&feed).await?;
        Ok(FeedRefresh::new(feed, url_count, outcome, false))
    }

    async fn resolve_and_commit(&self, feed: &Feed) -> Result<(usize, ChangeOutcome), AppError> {
        let urls = self.resolver.resolve(&feed.url, self.max_depth).await?;
        let outcome = self.detector.detect_and_commit(&feed.domain, &urls).await?;
        Ok((urls.len(), outcome))
    }

    /// Unregisters `url`. Snapshots of the site are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the URL is not registered.
    pub async fn remove(&self, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        let not_found = || AppError::not_found("Feed not registered", json!({ "url": url }));

        if !self.feeds.load().await?.iter().any(|f| f == url) {
            return Err(not_found());
        }

        let removed = shared_list::remove(
            self.feeds.as_ref(),
            url,
            &self.remove_policy,
            "feed_remove",
            || async { Ok(()) },
        )
        .await?;

        match removed {
            Removed::Removed => {
                info!(url, "Feed removed");
                Ok(())
            }
            Removed::NotPresent => Err(not_found()),
        }
    }

    /// Registered feeds in registration order.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        self.feeds.load().await
    }

    pub fn detector(&self) -> &ChangeDetector<S> {
        &self.detector
    }
}
