use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;

/// An origin-scoped string key-value store with no expiry.
///
/// All access is synchronous. Implementations are shared behind `Arc` by the
/// cache, the history and every orchestrator, so they must be `Send + Sync`;
/// concurrent writers to one key are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value could not be persisted.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Deletes `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the deletion could not be persisted.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Deletes every entry in the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the deletion could not be persisted.
    fn clear(&self) -> Result<(), StoreError>;

    /// Lists every key currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}
