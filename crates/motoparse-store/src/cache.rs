//! JSON key-value cache over a [`KeyValueStore`].
//!
//! Fails soft: a broken store or an undecodable value is logged and looks
//! exactly like a missing entry to callers. Nothing here returns an error.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::KeyValueStore;

/// Terminates a non-empty namespace, so `moto` never claims `motoparse:` keys.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Result of a cache read, for callers that want to know why a value is
/// absent. [`KeyValueCache::get`] folds everything but `Hit` into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Hit(T),
    Missing,
    /// A value exists but does not decode as `T`.
    Corrupt,
    /// The store could not be read.
    Failed,
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Missing | Lookup::Corrupt | Lookup::Failed => None,
        }
    }
}

/// Cloneable handle to a shared store. All clones see the same entries.
///
/// With an empty namespace (the default) keys are stored verbatim and
/// [`Self::clear`] wipes the entire store, including entries written by
/// anything else sharing it. A non-empty namespace always ends in
/// [`NAMESPACE_SEPARATOR`]; it prefixes every key and limits `clear` to
/// prefixed keys.
#[derive(Clone)]
pub struct KeyValueCache {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for KeyValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl KeyValueCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_namespace(store, "")
    }

    /// A namespace missing the trailing [`NAMESPACE_SEPARATOR`] gets one.
    #[must_use]
    pub fn with_namespace(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        let mut namespace = namespace.into();
        if !namespace.is_empty() && !namespace.ends_with(NAMESPACE_SEPARATOR) {
            namespace.push(NAMESPACE_SEPARATOR);
        }
        Self { store, namespace }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Reads and decodes the value under `key`, reporting why it is absent.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        let scoped = self.scoped_key(key);
        let raw = match self.store.get(&scoped) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Lookup::Missing,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read cache entry");
                return Lookup::Failed;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Lookup::Hit(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "cache entry does not decode; treating as missing");
                Lookup::Corrupt
            }
        }
    }

    /// Returns the value under `key`, or `None` if it is missing, corrupt or
    /// unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).into_option()
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// Failures are logged and dropped; callers must not assume the value
    /// was persisted.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.scoped_key(key), serialized) {
            tracing::error!(key, error = %e, "failed to write cache entry");
        }
    }

    /// Deletes the entry under `key`; a missing key is a no-op.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(&self.scoped_key(key)) {
            tracing::error!(key, error = %e, "failed to remove cache entry");
        }
    }

    /// Deletes every entry this cache can see. See the type docs for how the
    /// namespace changes what that means.
    pub fn clear(&self) {
        if self.namespace.is_empty() {
            if let Err(e) = self.store.clear() {
                tracing::error!(error = %e, "failed to clear cache");
            }
            return;
        }

        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(namespace = %self.namespace, error = %e, "failed to list cache keys");
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(&self.namespace)) {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(key = %key, error = %e, "failed to remove cache entry during clear");
            }
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
