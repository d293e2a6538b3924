//! qr_compare - decide whether two scanned QR codes carry the same payload
//!
//! Scan one code, scan another, and compare their payloads under a chosen
//! equivalence rule:
//! - [`NormalizationMode::Exact`]: NFC + whitespace trim
//! - [`NormalizationMode::CanonicalUrl`]: URL casing, trailing slash,
//!   tracking parameters and query order ignored
//! - [`NormalizationMode::DomainPath`]: only host and path compared
//!
//! The crate is split into a pure normalizer, a two-capture [`MatchEngine`],
//! and a [`ScanSession`] reducer that drives an external decoder and a
//! presentation layer through explicit events and effects. Decoding QR
//! symbols from camera frames is left to the [`session::Decoder`]
//! implementation.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Offline-first cache policy for the application shell
pub mod cache;
/// Session tunables read from the environment
pub mod config;
/// Two-capture match engine
pub mod engine;
/// Error types
pub mod error;
/// Core data types (modes, canonical values, outcomes, cameras)
pub mod models;
/// Payload normalization (exact, canonical URL, domain + path)
pub mod normalize;
/// Scan session reducer and runtime
pub mod session;
/// Batch evaluation of payload pairs
pub mod tools;

pub use config::SessionConfig;
pub use engine::MatchEngine;
pub use error::{DeviceError, InvalidStateError};
pub use models::{CameraSelector, CameraSource, CanonicalValue, NormalizationMode, Outcome, RoundState};
pub use normalize::{equivalent, normalize};
pub use session::{Effect, Event, ScanSession};

/// Normalize both payloads under `mode` and report the round outcome
///
/// Equivalent to submitting `first` then `second` to a fresh [`MatchEngine`].
///
/// # Example
/// ```
/// use qr_compare::{compare, NormalizationMode};
///
/// let outcome = compare(
///     "https://Example.com/Page/?utm_source=poster",
///     "https://example.com/Page",
///     NormalizationMode::CanonicalUrl,
/// );
/// assert_eq!(outcome.verdict(), Some(true));
/// ```
pub fn compare(first: &str, second: &str, mode: NormalizationMode) -> Outcome {
    let first = normalize(first, mode);
    let second = normalize(second, mode);
    if first == second {
        Outcome::Match { first, second }
    } else {
        Outcome::NoMatch { first, second }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_matches_engine() {
        for mode in NormalizationMode::ALL {
            let mut engine = MatchEngine::new(mode);
            engine.submit("https://A.test/x/").unwrap();
            let from_engine = engine.submit("https://a.test/x").unwrap();
            assert_eq!(compare("https://A.test/x/", "https://a.test/x", mode), from_engine);
        }
    }
}
