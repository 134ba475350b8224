//! Sitemap XML helpers: `<loc>` extraction, index classification and the
//! canonical URL-list document used for snapshots.
//!
//! Parsing is deliberately lenient. Real-world sitemaps are frequently
//! malformed, so values are pulled out with a pattern match instead of a
//! validating XML parser.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static LOC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").unwrap());

static CDATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^<!\[CDATA\[(.*)\]\]>$").unwrap());

const SITEMAP_INDEX_MARKER: &str = "<sitemapindex";

/// Namespace written into canonical snapshot documents.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Extracts every `<loc>` value from an XML payload, in document order.
///
/// Surrounding whitespace and CDATA wrappers are removed and the predefined
/// XML entities are decoded. Empty values are skipped.
///
/// # Examples
///
/// ```
/// use site_bot::utils::sitemap_xml::extract_locs;
///
/// let xml = "<urlset><url><loc> https://a.com/x?p=1&amp;q=2 </loc></url></urlset>";
/// assert_eq!(extract_locs(xml), vec!["https://a.com/x?p=1&q=2"]);
/// ```
pub fn extract_locs(xml: &str) -> Vec<String> {
    LOC_REGEX
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| unwrap_cdata(m.as_str()))
        .map(|raw| decode_entities(raw.trim()))
        .filter(|value| !value.is_empty())
        .collect()
}

fn unwrap_cdata(value: &str) -> &str {
    CDATA_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map_or(value, |m| m.as_str())
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn encode_entities(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Returns true if `url` is an absolute http(s) URL that parses.
pub fn is_valid_http_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

/// Returns true if `url` names a sitemap document rather than a content page.
///
/// A reference is sitemap-like when the last path segment contains
/// `sitemap` and ends in `.xml` (optionally gzipped), e.g.
/// `/sitemap-posts.xml` or `/wp-sitemap-pages-1.xml`.
pub fn is_sitemap_reference(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
        .to_ascii_lowercase();

    last_segment.contains("sitemap")
        && (last_segment.ends_with(".xml") || last_segment.ends_with(".xml.gz"))
}

/// How a fetched sitemap document should be treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// References to other sitemap documents, in document order.
    Index(Vec<String>),
    /// Content page URLs, in document order.
    Leaf(Vec<String>),
}

/// Classifies a payload as index or leaf and extracts the matching URLs.
///
/// A document is an index if it carries the `<sitemapindex` marker or if any
/// of its `<loc>` entries points at a sitemap-named file. For a marked index
/// every valid `<loc>` is a child reference. For an unmarked one only the
/// sitemap-like entries are. Leaf documents yield the valid content URLs and
/// drop sitemap-like references.
pub fn classify(xml: &str) -> SitemapDocument {
    let locs = extract_locs(xml);
    let marked_index = xml.contains(SITEMAP_INDEX_MARKER);
    let references_sitemaps = locs.iter().any(|loc| is_sitemap_reference(loc));

    if marked_index {
        SitemapDocument::Index(
            locs.into_iter()
                .filter(|loc| is_valid_http_url(loc))
                .collect(),
        )
    } else if references_sitemaps {
        SitemapDocument::Index(
            locs.into_iter()
                .filter(|loc| is_valid_http_url(loc) && is_sitemap_reference(loc))
                .collect(),
        )
    } else {
        SitemapDocument::Leaf(
            locs.into_iter()
                .filter(|loc| is_valid_http_url(loc))
                .collect(),
        )
    }
}

/// Serialises a URL list into the canonical snapshot document.
///
/// The output is deterministic for a given input sequence, so two snapshots
/// can be compared byte for byte.
pub fn to_canonical_xml<'a>(urls: impl IntoIterator<Item = &'a str>) -> String {
    let mut parts = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        format!(r#"<urlset xmlns="{}">"#, SITEMAP_NAMESPACE),
    ];

    for url in urls {
        parts.push(format!("  <url><loc>{}</loc></url>", encode_entities(url)));
    }

    parts.push("</urlset>".to_string());
    parts.join("\n")
}
