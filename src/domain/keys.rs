//! Logical key layout of the key-value store.
//!
//! Every persisted value lives under one of these keys. The backend adds its
//! own namespace prefix on top.

use chrono::NaiveDate;

/// Ordered list of registered root sitemap URLs (JSON array).
pub const FEEDS_LIST: &str = "feeds_list";

/// Monitored-domain set (JSON array).
pub const MONITORED_DOMAINS_LIST: &str = "monitored_domains_list";

/// Claim token of `item` in the list stored under `list`.
pub fn list_claim(list: &str, item: &str) -> String {
    format!("{}_claim_{}", list, item)
}

pub fn snapshot_current(domain: &str) -> String {
    format!("snapshot_current_{}", domain)
}

pub fn snapshot_latest(domain: &str) -> String {
    format!("snapshot_latest_{}", domain)
}

pub fn snapshot_dated(domain: &str, date: NaiveDate) -> String {
    format!("snapshot_dated_{}_{}", domain, date_stamp(date))
}

pub fn last_update(domain: &str) -> String {
    format!("last_update_{}", domain)
}

pub fn search_results(domain: &str) -> String {
    format!("search_results_{}", sanitize(domain))
}

pub fn search_last_check(domain: &str) -> String {
    format!("search_last_check_{}", sanitize(domain))
}

/// Calendar day as `YYYYMMDD`.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Lowercases ASCII and replaces characters outside `[a-z0-9.-]` with `_`.
///
/// Normalized domains only contain `[a-z0-9.-]` and pass through unchanged,
/// so distinct domains never share a key.
pub fn sanitize(domain: &str) -> String {
    domain
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(snapshot_current("a.com"), "snapshot_current_a.com");
        assert_eq!(snapshot_latest("a.com"), "snapshot_latest_a.com");
        assert_eq!(snapshot_dated("a.com", date), "snapshot_dated_a.com_20240307");
        assert_eq!(last_update("a.com"), "last_update_a.com");
    }

    #[test]
    fn test_search_keys_are_sanitized() {
        assert_eq!(search_results("my-site.co.uk"), "search_results_my-site.co.uk");
        assert_eq!(search_last_check("a.com"), "search_last_check_a.com");
        assert_eq!(search_results("a b/c"), "search_results_a_b_c");
    }

    #[test]
    fn test_search_keys_of_distinct_domains_differ() {
        assert_ne!(search_results("a-b.com"), search_results("a.b.com"));
        assert_ne!(search_last_check("a-b.com"), search_last_check("a.b.com"));
    }

    #[test]
    fn test_list_claim_key() {
        assert_eq!(
            list_claim(MONITORED_DOMAINS_LIST, "a.com"),
            "monitored_domains_list_claim_a.com"
        );
    }
}
