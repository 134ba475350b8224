//! Snapshot diffing and commit.

use std::sync::Arc;

use crate::domain::entities::{ChangeOutcome, Snapshot, SnapshotKind, diff_urls};
use crate::domain::repositories::SnapshotRepository;
use crate::error::AppError;
use crate::utils::sitemap_xml::{extract_locs, to_canonical_xml};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

/// Compares resolved URL sets with the stored snapshot of a site and
/// rotates snapshots when they differ.
///
/// All writes for one domain happen sequentially inside one call. Two
/// concurrent calls for the same domain are not guarded against.
pub struct ChangeDetector<S: SnapshotRepository> {
    snapshots: Arc<S>,
}

impl<S: SnapshotRepository> ChangeDetector<S> {
    pub fn new(snapshots: Arc<S>) -> Self {
        Self { snapshots }
    }

    /// Diffs `urls` against the current snapshot of `domain` and commits it if
    /// it differs.
    ///
    /// See [`Self::detect_and_commit_at`].
    pub async fn detect_and_commit(
        &self,
        domain: &str,
        urls: &[String],
    ) -> Result<ChangeOutcome, AppError> {
        self.detect_and_commit_at(domain, urls, Utc::now()).await
    }

    /// Diffs and commits as of `now`.
    ///
    /// # Behavior
    ///
    /// - Identical canonical document: unchanged, nothing is written
    /// - Otherwise `new_urls` holds the URLs absent from the previous
    ///   snapshot (all of them if there was none), the previous current
    ///   snapshot moves to the latest slot, and the new document is written as
    ///   current and as today's dated copy. The last-update marker is set to
    ///   `now`.
    pub async fn detect_and_commit_at(
        &self,
        domain: &str,
        urls: &[String],
        now: DateTime<Utc>,
    ) -> Result<ChangeOutcome, AppError> {
        let document = to_canonical_xml(urls.iter().map(String::as_str));
        let current = self.snapshots.get(domain, SnapshotKind::Current).await?;

        if current.as_deref() == Some(document.as_str()) {
            debug!(domain, urls = urls.len(), "Snapshot unchanged");
            return Ok(ChangeOutcome::unchanged());
        }

        let previous_urls = current.as_deref().map(extract_locs).unwrap_or_default();
        let new_urls = diff_urls(&previous_urls, urls);

        if let Some(previous) = &current {
            self.snapshots
                .put(domain, SnapshotKind::Latest, previous)
                .await?;
        }
        self.snapshots
            .put(domain, SnapshotKind::Current, &document)
            .await?;
        self.snapshots
            .put(domain, SnapshotKind::Dated(now.date_naive()), &document)
            .await?;
        self.snapshots
            .set_last_update(domain, &now.to_rfc3339())
            .await?;

        metrics::counter!("sitebot_new_urls_total").increment(new_urls.len() as u64);
        info!(
            domain,
            urls = urls.len(),
            new_urls = new_urls.len(),
            first_snapshot = current.is_none(),
            "Snapshot updated"
        );

        Ok(ChangeOutcome {
            is_changed: true,
            new_urls,
        })
    }

    /// Reads a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no snapshot of that kind exists.
    pub async fn snapshot(&self, domain: &str, kind: SnapshotKind) -> Result<Snapshot, AppError> {
        let document = self.snapshots.get(domain, kind).await?.ok_or_else(|| {
            AppError::not_found(
                "Snapshot not found",
                json!({ "domain": domain, "kind": kind.label() }),
            )
        })?;

        Ok(Snapshot {
            domain: domain.to_string(),
            kind: kind.label(),
            urls: extract_locs(&document),
        })
    }

    pub async fn last_update(&self, domain: &str) -> Result<Option<String>, AppError> {
        self.snapshots.last_update(domain).await
    }
}
