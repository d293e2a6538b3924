use unicode_normalization::UnicodeNormalization;

/// NFC-compose, then trim surrounding whitespace
///
/// Trimming follows ECMAScript `String.prototype.trim`: Unicode `White_Space`
/// plus the byte order mark, which a decoder occasionally leaves at the
/// start of byte-mode payloads.
pub fn normalize_exact(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    composed.trim_matches(is_trimmable).to_string()
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_composes() {
        // "e" + COMBINING ACUTE ACCENT
        assert_eq!(normalize_exact("  cafe\u{301}\n"), "caf\u{e9}");
        assert_eq!(normalize_exact("\u{feff}payload\t"), "payload");
    }

    #[test]
    fn test_keeps_case_and_inner_spacing() {
        assert_eq!(normalize_exact(" Hello  World "), "Hello  World");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_exact(""), "");
        assert_eq!(normalize_exact(" \u{a0}\u{3000} "), "");
    }
}
