//! End-to-end comparison scenarios
//!
//! Each scenario submits two payloads to a fresh match engine, the same way
//! a scan session does, and checks the round outcome.

use qr_compare::{
    CanonicalValue, InvalidStateError, MatchEngine, NormalizationMode, Outcome, RoundState,
    compare, normalize,
};

const TRACKED: &str = "https://Example.com/Page/?utm_source=x&b=2&a=1";
const CLEAN: &str = "https://example.com/Page?a=1&b=2";

fn round(mode: NormalizationMode, first: &str, second: &str) -> Outcome {
    let mut engine = MatchEngine::new(mode);
    let captured = engine.submit(first).expect("first submit on empty round");
    assert!(matches!(captured, Outcome::FirstCaptured { .. }));
    assert!(matches!(engine.state(), RoundState::AwaitingSecond { .. }));
    let outcome = engine.submit(second).expect("second submit");
    assert!(engine.state().is_resolved());
    outcome
}

#[test]
fn scenario_a_canonical_url_ignores_tracking_case_and_slash() {
    let outcome = round(NormalizationMode::CanonicalUrl, TRACKED, CLEAN);
    assert_eq!(
        outcome,
        Outcome::Match {
            first: CanonicalValue::new("https://example.com/Page?a=1&b=2"),
            second: CanonicalValue::new("https://example.com/Page?a=1&b=2"),
        }
    );
}

#[test]
fn scenario_b_exact_sees_every_difference() {
    let outcome = round(NormalizationMode::Exact, TRACKED, CLEAN);
    assert_eq!(outcome.verdict(), Some(false));
    if let Outcome::NoMatch { first, second } = outcome {
        assert_eq!(first, TRACKED);
        assert_eq!(second, CLEAN);
    }
}

#[test]
fn scenario_c_exact_trims_and_composes() {
    // second payload uses a combining accent
    let outcome = round(NormalizationMode::Exact, "  café  ", "cafe\u{301}");
    assert_eq!(outcome.verdict(), Some(true));
    let outcome = round(NormalizationMode::Exact, "  café  ", "café");
    assert_eq!(outcome.verdict(), Some(true));
}

#[test]
fn scenario_d_domain_path_falls_back_for_plain_text() {
    let text = "Table 12 - Espresso x2";
    let outcome = round(NormalizationMode::DomainPath, text, text);
    assert_eq!(
        outcome,
        Outcome::Match {
            first: CanonicalValue::new(text),
            second: CanonicalValue::new(text),
        }
    );
    assert_eq!(
        round(NormalizationMode::DomainPath, "Hello there", "hello there").verdict(),
        Some(false)
    );
}

#[test]
fn domain_path_ignores_query_and_fragment() {
    assert_eq!(
        round(
            NormalizationMode::DomainPath,
            "https://EXAMPLE.com/menu/?table=4#specials",
            "http://example.com/menu"
        )
        .verdict(),
        Some(true)
    );
    assert_eq!(normalize("HTTPS://X.com/P", NormalizationMode::DomainPath), "x.com/P");
}

#[test]
fn canonical_url_keeps_distinct_resources_apart() {
    for (a, b) in [
        ("https://example.com/Page", "https://example.com/page"),
        ("https://example.com/p?id=1", "https://example.com/p?id=2"),
        ("https://example.com/p", "http://example.com/p"),
        ("https://example.com:8443/p", "https://example.com/p"),
        ("https://example.com/p#a", "https://example.com/p#b"),
    ] {
        assert_eq!(
            compare(a, b, NormalizationMode::CanonicalUrl).verdict(),
            Some(false),
            "{a} vs {b}"
        );
    }
}

#[test]
fn query_key_order_is_deterministic() {
    let a = normalize("https://h.test/a?z=1&a=2", NormalizationMode::CanonicalUrl);
    let b = normalize("https://h.test/a?a=2&z=1", NormalizationMode::CanonicalUrl);
    assert_eq!(a, b);
    assert_eq!(a, "https://h.test/a?a=2&z=1");
}

#[test]
fn engine_rejects_third_submit_until_reset() {
    let mut engine = MatchEngine::new(NormalizationMode::CanonicalUrl);
    engine.submit(TRACKED).unwrap();
    engine.submit(CLEAN).unwrap();
    assert_eq!(engine.submit(CLEAN), Err(InvalidStateError::SubmitWhileResolved));

    engine.reset();
    assert_eq!(engine.state(), &RoundState::Empty);
    assert!(matches!(
        engine.submit(CLEAN),
        Ok(Outcome::FirstCaptured { .. })
    ));
}
