//! Domain name validation for the monitored-domain set.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$")
        .unwrap()
});

const MAX_DOMAIN_LENGTH: usize = 253;

/// Normalizes and validates a bare domain name.
///
/// Surrounding whitespace is trimmed and the result is lowercased. Schemes,
/// paths and ports are rejected rather than stripped.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the value is empty, too long, or does
/// not match the label grammar.
///
/// # Examples
///
/// ```
/// use site_bot::utils::domain_name::normalize_domain;
///
/// assert_eq!(normalize_domain(" Example.COM ").unwrap(), "example.com");
/// assert!(normalize_domain("https://example.com").is_err());
/// assert!(normalize_domain("-bad.com").is_err());
/// ```
pub fn normalize_domain(raw: &str) -> Result<String, AppError> {
    let domain = raw.trim().to_ascii_lowercase();

    if domain.is_empty() {
        return Err(AppError::bad_request(
            "Domain must not be empty",
            json!({ "domain": raw }),
        ));
    }

    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(AppError::bad_request(
            "Domain is too long",
            json!({ "domain": raw, "max_length": MAX_DOMAIN_LENGTH }),
        ));
    }

    if !DOMAIN_REGEX.is_match(&domain) {
        return Err(AppError::bad_request(
            "Invalid domain format",
            json!({ "domain": raw }),
        ));
    }

    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        for d in ["example.com", "a.b.c.example.org", "x1-y2.io", "localhost"] {
            assert_eq!(normalize_domain(d).unwrap(), d);
        }
    }

    #[test]
    fn test_invalid_domains() {
        for d in [
            "",
            "   ",
            "example..com",
            "exa mple.com",
            "example.com/path",
            "example.com:8080",
            "-example.com",
            "example-.com",
            "https://example.com",
        ] {
            let err = normalize_domain(d).unwrap_err();
            assert_eq!(err.code(), "validation_error", "{:?} should be rejected", d);
        }
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}.com", "a.".repeat(130));
        assert!(normalize_domain(&long).is_err());
    }
}
