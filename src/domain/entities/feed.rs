//! Feed entity: a registered root sitemap URL.

use crate::domain::entities::ChangeOutcome;
use crate::error::AppError;
use crate::utils::sitemap_xml::is_valid_http_url;
use serde::Serialize;
use serde_json::json;
use url::Url;

/// A root sitemap URL together with the site it belongs to.
///
/// Snapshots are keyed by `domain`, the host of the sitemap URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub url: String,
    pub domain: String,
}

impl Feed {
    /// Parses and validates a root sitemap URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] unless `url` is an absolute http(s) URL
    /// with a host.
    pub fn parse(url: &str) -> Result<Self, AppError> {
        let url = url.trim();
        let host = Url::parse(url)
            .ok()
            .filter(|_| is_valid_http_url(url))
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .ok_or_else(|| AppError::bad_request("Invalid sitemap URL", json!({ "url": url })))?;

        Ok(Self {
            url: url.to_string(),
            domain: host,
        })
    }
}

/// Result of registering or refreshing a feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedRefresh {
    pub url: String,
    pub domain: String,
    /// Number of URLs the resolution produced, duplicates included.
    pub resolved: usize,
    pub is_changed: bool,
    pub new_urls: Vec<String>,
    /// False when the URL was already registered.
    pub newly_registered: bool,
}

impl FeedRefresh {
    pub fn new(feed: Feed, resolved: usize, outcome: ChangeOutcome, newly_registered: bool) -> Self {
        Self {
            url: feed.url,
            domain: feed.domain,
            resolved,
            is_changed: outcome.is_changed,
            new_urls: outcome.new_urls,
            newly_registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_host() {
        let feed = Feed::parse(" https://Blog.Example.com/sitemap.xml ").unwrap();
        assert_eq!(feed.url, "https://Blog.Example.com/sitemap.xml");
        assert_eq!(feed.domain, "blog.example.com");
    }

    #[test]
    fn test_parse_rejects_non_http() {
        assert!(Feed::parse("ftp://example.com/sitemap.xml").is_err());
        assert!(Feed::parse("example.com/sitemap.xml").is_err());
        assert!(Feed::parse("").is_err());
    }
}
