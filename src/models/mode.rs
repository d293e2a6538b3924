use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Equivalence rule used to canonicalize a scanned payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    /// NFC + whitespace trim, otherwise byte-for-byte
    #[default]
    Exact,
    /// Scheme/host casing, trailing slash and tracking parameters ignored
    CanonicalUrl,
    /// Only lowercase host and path are compared
    DomainPath,
}

impl NormalizationMode {
    /// All modes, in selector order
    pub const ALL: [NormalizationMode; 3] = [
        NormalizationMode::Exact,
        NormalizationMode::CanonicalUrl,
        NormalizationMode::DomainPath,
    ];

    /// Stable identifier (`exact`, `canonical-url`, `domain-path`)
    pub fn id(&self) -> &'static str {
        match self {
            NormalizationMode::Exact => "exact",
            NormalizationMode::CanonicalUrl => "canonical-url",
            NormalizationMode::DomainPath => "domain-path",
        }
    }

    /// Human readable label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            NormalizationMode::Exact => "Exact",
            NormalizationMode::CanonicalUrl => "Canonical URL",
            NormalizationMode::DomainPath => "Domain + Path",
        }
    }
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a mode identifier is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown normalization mode `{0}` (expected exact, canonical-url or domain-path)")]
pub struct UnknownModeError(pub String);

impl FromStr for NormalizationMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        NormalizationMode::ALL
            .into_iter()
            .find(|mode| mode.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}
