//! Offline-first asset cache
//!
//! The cache policy of the scanner's static shell: pre-populate on install,
//! drop old versions on activate, and answer requests cache-first for our
//! own origin and network-first for everything else. Storage and network
//! sit behind [`CacheStorage`] and [`Network`] so the policy can run against
//! any backend; [`MemoryStorage`] is the in-process one.

/// In-memory cache storage
pub mod storage;

pub use storage::MemoryStorage;

use crate::config::DEFAULT_CACHE_VERSION;
use crate::error::{CacheError, FetchError};
use log::{debug, warn};
use url::Url;

/// Static assets of the application shell, relative to the origin
pub const SHELL_ASSETS: [&str; 5] = [
    "./",
    "./index.html",
    "./styles.css",
    "./app.js",
    "./manifest.json",
];

/// A cached or fetched response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// A 200 response with `body`
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Named response caches, keyed by request URL
pub trait CacheStorage {
    /// Names of every cache
    fn cache_names(&self) -> Vec<String>;
    /// Delete a whole cache; returns false if it did not exist
    fn delete_cache(&mut self, name: &str) -> bool;
    /// Store `response` under `url` in cache `name`, creating the cache if needed
    fn put(&mut self, name: &str, url: &Url, response: Response);
    /// Look `url` up in every cache
    fn lookup(&self, url: &Url) -> Option<Response>;
}

/// Network access
pub trait Network {
    /// Fetch `url`
    fn fetch(&mut self, url: &Url) -> Result<Response, FetchError>;
}

/// Versioned cache policy for one origin
#[derive(Debug, Clone)]
pub struct AssetCache {
    version: String,
    origin: Url,
    assets: Vec<String>,
}

impl AssetCache {
    /// Cache the application shell of `origin` under the default version
    pub fn new(origin: Url) -> Self {
        Self::with_version(origin, DEFAULT_CACHE_VERSION)
    }

    /// Cache the application shell of `origin` under `version`
    pub fn with_version(origin: Url, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            origin,
            assets: SHELL_ASSETS.iter().map(|path| path.to_string()).collect(),
        }
    }

    /// Replace the asset manifest
    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Current cache name
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Absolute URLs of every manifest entry
    pub fn asset_urls(&self) -> Result<Vec<Url>, CacheError> {
        self.assets
            .iter()
            .map(|path| {
                self.origin
                    .join(path)
                    .map_err(|err| CacheError::InvalidAsset {
                        path: path.clone(),
                        reason: err.to_string(),
                    })
            })
            .collect()
    }

    /// Fetch every asset and store them under the current version
    ///
    /// Nothing is stored unless every asset fetched successfully.
    pub fn install<S, N>(&self, storage: &mut S, network: &mut N) -> Result<usize, CacheError>
    where
        S: CacheStorage,
        N: Network,
    {
        let mut fetched = Vec::new();
        for url in self.asset_urls()? {
            let response = network.fetch(&url).map_err(|source| CacheError::Fetch {
                url: url.to_string(),
                source,
            })?;
            if !response.is_success() {
                return Err(CacheError::BadStatus {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((url, response));
        }

        let count = fetched.len();
        for (url, response) in fetched {
            storage.put(&self.version, &url, response);
        }
        debug!("installed {count} assets into {}", self.version);
        Ok(count)
    }

    /// Delete every cache but the current version; returns the deleted names
    pub fn activate<S: CacheStorage>(&self, storage: &mut S) -> Vec<String> {
        let stale: Vec<String> = storage
            .cache_names()
            .into_iter()
            .filter(|name| *name != self.version)
            .collect();
        for name in &stale {
            storage.delete_cache(name);
        }
        if !stale.is_empty() {
            debug!("activated {}, removed {stale:?}", self.version);
        }
        stale
    }

    /// Answer a request
    ///
    /// Same-origin: cache, then network. Cross-origin: network (caching
    /// successful responses), then cache when the network fails.
    pub fn fetch<S, N>(&self, storage: &mut S, network: &mut N, url: &Url) -> Result<Response, FetchError>
    where
        S: CacheStorage,
        N: Network,
    {
        if url.origin() == self.origin.origin() {
            if let Some(cached) = storage.lookup(url) {
                return Ok(cached);
            }
            return network.fetch(url);
        }

        match network.fetch(url) {
            Ok(response) => {
                if response.is_success() {
                    storage.put(&self.version, url, response.clone());
                }
                Ok(response)
            }
            Err(err) => {
                warn!("network failed for {url} ({err}), trying cache");
                storage
                    .lookup(url)
                    .ok_or_else(|| FetchError::NotCached(url.to_string()))
            }
        }
    }
}
