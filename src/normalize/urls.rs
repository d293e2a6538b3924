//! URL-aware canonical forms
//!
//! Both functions return `Err` when the payload is not an absolute URL; the
//! caller decides how to fall back.

use super::collate::locale_cmp;
use url::{ParseError, Url};

/// Query keys that carry marketing attribution only
pub const TRACKING_KEYS: [&str; 7] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
];

/// True if `key` is on the tracking-parameter blocklist
pub fn is_tracking_key(key: &str) -> bool {
    TRACKING_KEYS.contains(&key)
}

/// Canonical URL string: lowercase scheme and host, no trailing slash,
/// no tracking parameters, remaining parameters sorted by key
pub fn canonical_url(raw: &str) -> Result<String, ParseError> {
    let mut url = Url::parse(raw)?;

    // The parser lowercases the scheme and special-scheme hosts; opaque
    // hosts of other schemes keep their case until here.
    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host {
            let _ = url.set_host(Some(&lowered));
        }
    }

    if !url.cannot_be_a_base() && url.path() != "/" {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    if url.query().is_some() {
        let mut kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_key(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        kept.sort_by(|(a, _), (b, _)| locale_cmp(a, b));

        url.set_query(None);
        if !kept.is_empty() {
            url.query_pairs_mut().extend_pairs(kept);
        }
    }

    Ok(url.into())
}

/// `host + path`, host lowercased, trailing slashes dropped, query and fragment ignored
pub fn domain_path(raw: &str) -> Result<String, ParseError> {
    let url = Url::parse(raw)?;
    let host = url.host_str().unwrap_or_default().to_lowercase();
    Ok(format!("{host}{}", url.path().trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_url_lowercases_scheme_and_host_only() {
        assert_eq!(
            canonical_url("HTTPS://Example.COM/Some/Path").unwrap(),
            "https://example.com/Some/Path"
        );
    }

    #[test]
    fn test_canonical_url_strips_trailing_slash_but_not_root() {
        assert_eq!(canonical_url("https://x.com/p/").unwrap(), "https://x.com/p");
        assert_eq!(canonical_url("https://x.com/").unwrap(), "https://x.com/");
        assert_eq!(canonical_url("https://x.com").unwrap(), "https://x.com/");
    }

    #[test]
    fn test_canonical_url_drops_tracking_and_sorts() {
        assert_eq!(
            canonical_url("https://shop.test/item?utm_source=poster&z=1&gclid=abc&a=2").unwrap(),
            "https://shop.test/item?a=2&z=1"
        );
    }

    #[test]
    fn test_canonical_url_removes_question_mark_when_query_empties() {
        assert_eq!(
            canonical_url("https://x.com/p?utm_medium=qr&fbclid=1").unwrap(),
            "https://x.com/p"
        );
        assert_eq!(canonical_url("https://x.com/p?").unwrap(), "https://x.com/p");
    }

    #[test]
    fn test_canonical_url_sort_is_stable_for_repeated_keys() {
        assert_eq!(
            canonical_url("https://x.com/?b=1&a=2&b=0&a=1").unwrap(),
            "https://x.com/?a=2&a=1&b=1&b=0"
        );
    }

    #[test]
    fn test_canonical_url_orders_underscore_keys_before_digit_keys() {
        assert_eq!(
            canonical_url("https://x.com/list?page2=1&page_size=10").unwrap(),
            "https://x.com/list?page_size=10&page2=1"
        );
    }

    #[test]
    fn test_canonical_url_keeps_fragment_port_and_credentials() {
        assert_eq!(
            canonical_url("http://User:Pw@Host.test:8080/a/?b=2#Frag").unwrap(),
            "http://User:Pw@host.test:8080/a?b=2#Frag"
        );
    }

    #[test]
    fn test_canonical_url_reencodes_query_as_form_data() {
        assert_eq!(
            canonical_url("https://x.com/s?q=hello%20world").unwrap(),
            "https://x.com/s?q=hello+world"
        );
    }

    #[test]
    fn test_non_special_scheme_host_is_lowercased() {
        assert_eq!(
            canonical_url("myapp://Open.Item/42/").unwrap(),
            "myapp://open.item/42"
        );
    }

    #[test]
    fn test_domain_path() {
        assert_eq!(
            domain_path("https://Example.com/Page/?a=1#top").unwrap(),
            "example.com/Page"
        );
        assert_eq!(domain_path("https://example.com/").unwrap(), "example.com");
        assert_eq!(domain_path("mailto:someone@example.com").unwrap(), "someone@example.com");
    }

    #[test]
    fn test_rejects_relative_and_plain_text() {
        assert!(canonical_url("a?z=1&a=2").is_err());
        assert!(domain_path("just some text").is_err());
        assert!(domain_path("").is_err());
    }
}
