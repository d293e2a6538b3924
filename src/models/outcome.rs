use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized payload; two values match iff their text is equal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalValue(String);

impl CanonicalValue {
    /// Wrap an already-normalized string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the canonical text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Result of submitting one capture to the match engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// First value of the round stored, waiting for the second
    FirstCaptured {
        /// Canonical form of the first capture
        value: CanonicalValue,
    },
    /// Both captures normalized to the same value
    Match {
        /// Canonical form of the first capture
        first: CanonicalValue,
        /// Canonical form of the second capture
        second: CanonicalValue,
    },
    /// The captures normalized to different values
    NoMatch {
        /// Canonical form of the first capture
        first: CanonicalValue,
        /// Canonical form of the second capture
        second: CanonicalValue,
    },
}

impl Outcome {
    /// `Some(true)` for a match, `Some(false)` for a mismatch, `None` after the first capture
    pub fn verdict(&self) -> Option<bool> {
        match self {
            Outcome::FirstCaptured { .. } => None,
            Outcome::Match { .. } => Some(true),
            Outcome::NoMatch { .. } => Some(false),
        }
    }
}

/// Progress of the current round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoundState {
    /// Nothing captured yet
    #[default]
    Empty,
    /// First capture stored
    AwaitingSecond {
        /// Canonical form of the first capture
        first: CanonicalValue,
    },
    /// Outcome computed; only `reset` leaves this state
    Resolved {
        /// The final outcome (`Match` or `NoMatch`)
        outcome: Outcome,
    },
}

impl RoundState {
    /// True when no value has been captured in this round
    pub fn is_empty(&self) -> bool {
        matches!(self, RoundState::Empty)
    }

    /// True once the round has an outcome
    pub fn is_resolved(&self) -> bool {
        matches!(self, RoundState::Resolved { .. })
    }
}
