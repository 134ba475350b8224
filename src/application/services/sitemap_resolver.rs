//! Recursive sitemap resolution.

use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::infrastructure::http::SitemapFetcher;
use crate::utils::sitemap_xml::{SitemapDocument, classify};
use tracing::{debug, info, warn};

/// Flattens a (possibly nested) sitemap index into content URLs.
///
/// Child documents are fetched one at a time with a fixed pause between
/// requests. Traversal is depth-first in document order, so the result lists
/// URLs exactly as a recursive walk would, duplicates included.
pub struct SitemapResolver<F: SitemapFetcher> {
    fetcher: Arc<F>,
    child_delay: Duration,
}

impl<F: SitemapFetcher> SitemapResolver<F> {
    pub fn new(fetcher: Arc<F>, child_delay: Duration) -> Self {
        Self {
            fetcher,
            child_delay,
        }
    }

    /// Resolves `root_url` to the concatenated URLs of every reachable leaf.
    ///
    /// The root counts as depth `max_depth`; each index level below it one
    /// less. References that would be fetched at depth zero are dropped, which
    /// bounds self-referencing indexes. With `max_depth == 0` nothing is
    /// fetched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Fetch`] if the root document cannot be fetched.
    /// A failed child fetch is logged and contributes no URLs.
    pub async fn resolve(&self, root_url: &str, max_depth: usize) -> Result<Vec<String>, AppError> {
        if max_depth == 0 {
            return Ok(Vec::new());
        }

        let root = self.fetcher.fetch(root_url).await.map_err(|e| {
            warn!(url = root_url, error = %e, "Root sitemap fetch failed");
            AppError::from(e)
        })?;

        let mut urls = Vec::new();
        // (reference, depth it would be fetched at); popped in document order
        let mut pending: Vec<(String, usize)> = Vec::new();
        let mut fetched = 1usize;

        Self::expand(&root, max_depth, &mut urls, &mut pending);

        while let Some((url, depth)) = pending.pop() {
            if depth == 0 {
                debug!(url, "Depth limit reached, not following");
                continue;
            }

            if !self.child_delay.is_zero() {
                tokio::time::sleep(self.child_delay).await;
            }

            fetched += 1;
            match self.fetcher.fetch(&url).await {
                Ok(body) => Self::expand(&body, depth, &mut urls, &mut pending),
                Err(e) => warn!(url, error = %e, "Child sitemap fetch failed, skipping"),
            }
        }

        info!(
            url = root_url,
            documents = fetched,
            urls = urls.len(),
            "Sitemap resolved"
        );
        Ok(urls)
    }

    fn expand(body: &str, depth: usize, urls: &mut Vec<String>, pending: &mut Vec<(String, usize)>) {
        match classify(body) {
            SitemapDocument::Index(children) => {
                debug!(children = children.len(), depth, "Sitemap index");
                pending.extend(children.into_iter().rev().map(|child| (child, depth - 1)));
            }
            SitemapDocument::Leaf(found) => urls.extend(found),
        }
    }
}
