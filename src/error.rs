//! Error types
//!
//! URL parse failures never appear here: the normalizer recovers from them
//! locally by falling back to exact-text comparison.

use thiserror::Error;

/// A caller broke the match engine's calling contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    /// `submit` was called after the round resolved and before `reset`
    #[error("round already resolved; reset before submitting another capture")]
    SubmitWhileResolved,
    /// The normalization mode was changed while a round was in progress
    #[error("normalization mode can only change before the first capture of a round")]
    ModeChangeOutsideEmpty,
}

/// The camera or decoder could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The user or platform refused camera access
    #[error("camera permission denied")]
    PermissionDenied,
    /// No video input is available
    #[error("no camera found")]
    NoCamera,
    /// Camera access requires a secure (HTTPS) context
    #[error("camera access requires a secure context")]
    InsecureContext,
    /// Any other start failure reported by the decoder
    #[error("{0}")]
    Other(String),
}

/// A network fetch made on behalf of the asset cache failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No network connection
    #[error("network unavailable")]
    Offline,
    /// The request could not be completed
    #[error("request to {url} failed: {reason}")]
    Failed {
        /// Requested URL
        url: String,
        /// Transport level reason
        reason: String,
    },
    /// Neither network nor cache could answer the request
    #[error("no cached response for {0}")]
    NotCached(String),
}

/// Installing or activating the asset cache failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A manifest entry does not resolve against the origin
    #[error("invalid asset path `{path}`: {reason}")]
    InvalidAsset {
        /// Manifest entry
        path: String,
        /// Parser message
        reason: String,
    },
    /// An asset could not be fetched during install
    #[error("failed to fetch asset {url}: {source}")]
    Fetch {
        /// Asset URL
        url: String,
        /// Underlying fetch failure
        #[source]
        source: FetchError,
    },
    /// An asset answered with a non-success status during install
    #[error("asset {url} returned HTTP {status}")]
    BadStatus {
        /// Asset URL
        url: String,
        /// HTTP status code
        status: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DeviceError::Other("NotReadableError".to_string()).to_string(),
            "NotReadableError"
        );
        let err = CacheError::Fetch {
            url: "https://app.test/app.js".to_string(),
            source: FetchError::Offline,
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch asset https://app.test/app.js: network unavailable"
        );
    }
}
