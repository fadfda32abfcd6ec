//! Bounded, deduplicated, most-recent-first list of submitted URLs.
//!
//! Stored as a single cache entry under [`HISTORY_KEY`], alongside the
//! parse results. Entries are taken verbatim: normalize before calling
//! [`HistoryStore::add`] if two spellings should count as one.

use crate::cache::KeyValueCache;

/// Reserved cache key for the history list.
pub const HISTORY_KEY: &str = "searchHistory";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    cache: KeyValueCache,
    limit: usize,
}

impl HistoryStore {
    #[must_use]
    pub fn new(cache: KeyValueCache) -> Self {
        Self::with_limit(cache, DEFAULT_HISTORY_LIMIT)
    }

    /// A `limit` of zero is treated as one.
    #[must_use]
    pub fn with_limit(cache: KeyValueCache, limit: usize) -> Self {
        Self {
            cache,
            limit: limit.max(1),
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the persisted list, or an empty one if it is absent or corrupt.
    /// A corrupt list is reported by the cache read itself.
    #[must_use]
    pub fn load(&self) -> Vec<String> {
        self.cache.get(HISTORY_KEY).unwrap_or_default()
    }

    /// Moves `url` to the front, dropping any earlier occurrence and anything
    /// past the limit. Returns the list as persisted.
    pub fn add(&self, url: &str) -> Vec<String> {
        let mut entries = self.load();
        entries.retain(|entry| entry != url);
        entries.insert(0, url.to_owned());
        entries.truncate(self.limit);
        self.cache.set(HISTORY_KEY, &entries);
        entries
    }

    /// Removes the entry exactly equal to `url`. Returns the remaining list.
    pub fn remove(&self, url: &str) -> Vec<String> {
        let mut entries = self.load();
        entries.retain(|entry| entry != url);
        self.cache.set(HISTORY_KEY, &entries);
        entries
    }

    /// Deletes the history entry. Parse results in the same cache stay.
    pub fn clear(&self) {
        self.cache.remove(HISTORY_KEY);
    }
}
