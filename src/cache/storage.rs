use super::{CacheStorage, Response};
use std::collections::BTreeMap;
use url::Url;

/// In-memory [`CacheStorage`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    caches: BTreeMap<String, BTreeMap<String, Response>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in cache `name`
    pub fn entry_count(&self, name: &str) -> usize {
        self.caches.get(name).map_or(0, BTreeMap::len)
    }
}

impl CacheStorage for MemoryStorage {
    fn cache_names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    fn delete_cache(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    fn put(&mut self, name: &str, url: &Url, response: Response) {
        self.caches
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    // first hit in cache-name order
    fn lookup(&self, url: &Url) -> Option<Response> {
        let key = url.as_str();
        self.caches
            .values()
            .find_map(|entries| entries.get(key).cloned())
    }
}
