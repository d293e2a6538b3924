use qr_compare::NormalizationMode;
use qr_compare::tools::{PairCase, parse_pairs};

const SAMPLE_PAIRS: &str = "\
canonical-url\thttps://Example.com/Page/?utm_source=x&b=2&a=1\thttps://example.com/Page?a=1&b=2
canonical-url\thttps://shop.test/item?gclid=abc&size=M&color=red\thttps://shop.test/item/?color=red&size=M
domain-path\tHTTPS://X.com/P/?q=1#frag\thttps://x.com/P
domain-path\tWIFI:S:home;T:WPA;P:secret;;\tWIFI:S:home;T:WPA;P:secret;;
exact\t  caf\u{e9}  \tcafe\u{301}
";

/// A fixed mix of URL and plain-text payload pairs
pub fn sample_pairs() -> Vec<PairCase> {
    parse_pairs(SAMPLE_PAIRS).unwrap_or_default()
}

/// `count` copies of the sample pairs under every mode
pub fn scaled_pairs(count: usize) -> Vec<PairCase> {
    let base = sample_pairs();
    (0..count)
        .flat_map(|_| {
            base.iter().flat_map(|case| {
                NormalizationMode::ALL.into_iter().map(move |mode| PairCase {
                    mode,
                    ..case.clone()
                })
            })
        })
        .collect()
}
