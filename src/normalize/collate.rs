//! Locale-aware ordering for query keys
//!
//! Approximates root-locale collation with three strength levels:
//! base letters (accents and case ignored), then accents, then case with
//! lowercase sorting first. At the base level whitespace sorts before
//! punctuation and symbols, those before digits, and digits before letters.
//! Strings equal on all three levels fall back to code point order so the
//! comparison stays total.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two keys the way a user-facing sort would
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_group(c), c))
}

fn char_group(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_alphabetic() {
        3
    } else if c.is_numeric() {
        2
    } else {
        1
    }
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

// 0 for anything that is not uppercase, so "a" < "A"
fn case_marks(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| u8::from(c.is_uppercase()))
}
