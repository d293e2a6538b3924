//! Payload normalization
//!
//! Maps a raw decoded string to its canonical form under a
//! [`NormalizationMode`]:
//! - Exact: NFC + whitespace trim
//! - Canonical URL: casing, trailing slash, tracking parameters and query
//!   order ignored
//! - Domain + Path: only host and path compared
//!
//! Normalization is total. Input that does not parse as an absolute URL is
//! compared with the exact rule under every mode.

/// Locale-aware key ordering
pub mod collate;
/// Exact rule: NFC + trim
pub mod exact;
/// URL rules
pub mod urls;

use crate::models::{CanonicalValue, NormalizationMode};
use log::trace;

pub use self::exact::normalize_exact;
pub use self::urls::{TRACKING_KEYS, canonical_url, domain_path, is_tracking_key};

/// Canonical form of `raw` under `mode`
pub fn normalize(raw: &str, mode: NormalizationMode) -> CanonicalValue {
    let parsed = match mode {
        NormalizationMode::Exact => return CanonicalValue::new(normalize_exact(raw)),
        NormalizationMode::CanonicalUrl => canonical_url(raw),
        NormalizationMode::DomainPath => domain_path(raw),
    };

    match parsed {
        Ok(value) => CanonicalValue::new(value),
        Err(err) => {
            trace!("{mode}: payload is not a URL ({err}), comparing exact text");
            CanonicalValue::new(normalize_exact(raw))
        }
    }
}

/// True when `a` and `b` share a canonical form under `mode`
pub fn equivalent(a: &str, b: &str, mode: NormalizationMode) -> bool {
    normalize(a, mode) == normalize(b, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_mode() {
        assert_eq!(normalize("  café  ", NormalizationMode::Exact), "café");
        assert!(!equivalent("ABC", "abc", NormalizationMode::Exact));
    }

    #[test]
    fn test_trailing_slash_insensitive() {
        assert_eq!(
            normalize("https://x.com/p/", NormalizationMode::CanonicalUrl),
            normalize("https://x.com/p", NormalizationMode::CanonicalUrl)
        );
    }

    #[test]
    fn test_query_order_is_deterministic() {
        assert!(equivalent(
            "https://h.test/a?z=1&a=2",
            "https://h.test/a?a=2&z=1",
            NormalizationMode::CanonicalUrl
        ));
    }

    #[test]
    fn test_domain_path_folds_host_not_path() {
        assert_eq!(normalize("HTTPS://X.com/P", NormalizationMode::DomainPath), "x.com/P");
        assert!(!equivalent(
            "https://x.com/P",
            "https://x.com/p",
            NormalizationMode::DomainPath
        ));
    }

    #[test]
    fn test_non_url_falls_back_to_exact() {
        for mode in [NormalizationMode::CanonicalUrl, NormalizationMode::DomainPath] {
            assert_eq!(normalize("  Hello, World  ", mode), "Hello, World");
            assert_eq!(normalize("a?z=1&a=2", mode), "a?z=1&a=2");
            assert_eq!(normalize("", mode), "");
        }
    }

    #[test]
    fn test_scheme_prefixed_text_parses_as_opaque_url() {
        assert_eq!(
            normalize("WIFI:S:home;;", NormalizationMode::CanonicalUrl),
            "wifi:S:home;;"
        );
        assert_eq!(normalize("WIFI:S:home;;", NormalizationMode::DomainPath), "S:home;;");
    }

    fn url_strategy() -> impl Strategy<Value = String> {
        let key = prop_oneof![
            Just("utm_source".to_string()),
            Just("utm_medium".to_string()),
            Just("utm_campaign".to_string()),
            Just("utm_term".to_string()),
            Just("utm_content".to_string()),
            Just("gclid".to_string()),
            Just("fbclid".to_string()),
            "[a-zA-Z_]{1,6}",
        ];
        (
            prop_oneof![Just("http"), Just("HTTPS"), Just("Https")],
            "[a-zA-Z]{1,8}\\.(com|org|TEST)",
            prop::collection::vec("[a-zA-Z0-9%-]{0,5}", 0..4),
            prop::option::of(Just("/")),
            prop::collection::vec((key, "[a-zA-Z0-9 +%]{0,4}"), 0..6),
        )
            .prop_map(|(scheme, host, segments, trailing, params)| {
                let mut url = format!("{scheme}://{host}/{}", segments.join("/"));
                if let Some(slash) = trailing {
                    url.push_str(slash);
                }
                if !params.is_empty() {
                    let query: Vec<String> =
                        params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    url.push('?');
                    url.push_str(&query.join("&"));
                }
                url
            })
    }

    proptest! {
        #[test]
        fn exact_is_idempotent(s in "\\PC*") {
            let once = normalize(&s, NormalizationMode::Exact);
            let twice = normalize(once.as_str(), NormalizationMode::Exact);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn exact_output_has_no_surrounding_whitespace(s in "[ \\t]{0,3}[a-zA-Z\u{300}-\u{36f}é ]{0,12}[ \\t\\n]{0,3}") {
            let once = normalize(&s, NormalizationMode::Exact);
            prop_assert_eq!(once.as_str(), once.as_str().trim());
        }

        #[test]
        fn canonical_url_drops_tracking_keys(input in url_strategy()) {
            let canonical = normalize(&input, NormalizationMode::CanonicalUrl);
            let parsed = url::Url::parse(canonical.as_str()).unwrap();
            for (key, _) in parsed.query_pairs() {
                prop_assert!(!is_tracking_key(&key), "{} kept in {}", key, canonical);
            }
        }

        #[test]
        fn canonical_url_is_idempotent(input in url_strategy()) {
            let once = normalize(&input, NormalizationMode::CanonicalUrl);
            let twice = normalize(once.as_str(), NormalizationMode::CanonicalUrl);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn domain_path_has_no_trailing_slash(input in url_strategy()) {
            let value = normalize(&input, NormalizationMode::DomainPath);
            prop_assert!(!value.as_str().ends_with('/'));
            prop_assert_eq!(value.as_str(), value.as_str().trim());
        }

        #[test]
        fn normalize_never_panics(s in "\\PC*") {
            for mode in NormalizationMode::ALL {
                let _ = normalize(&s, mode);
            }
        }
    }
}
