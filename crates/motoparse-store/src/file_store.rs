//! Disk-backed [`KeyValueStore`], one JSON document per origin.
//!
//! Nothing is cached in memory: every operation reads the document under a
//! lock file (shared for reads, exclusive for writes), and every mutation
//! re-reads, applies its change and rewrites the document through a temp
//! file plus rename. Several processes can share one origin store and the
//! last write wins per key, not per document.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::store::KeyValueStore;

const DOCUMENT_NAME: &str = "store.json";
const TEMP_NAME: &str = "store.json.tmp";
const LOCK_NAME: &str = "store.lock";

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Opens the store for `origin` under `data_dir`, creating it if missing.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the directory cannot be created or the
    ///   document cannot be read.
    /// - [`StoreError::Corrupt`] if the document is not a JSON string map.
    pub fn open(data_dir: &Path, origin: &str) -> Result<Self, StoreError> {
        let store = Self::at(&origin_dir(data_dir, origin))?;
        let entries = store.read_locked()?;
        tracing::debug!(path = %store.path.display(), entries = entries.len(), "opened store");
        Ok(store)
    }

    /// Like [`Self::open`], but a corrupt document is replaced by an empty
    /// one instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or document cannot be
    /// accessed at all.
    pub fn open_or_reset(data_dir: &Path, origin: &str) -> Result<Self, StoreError> {
        let store = Self::at(&origin_dir(data_dir, origin))?;
        let _lock = store.lock(true)?;
        match store.read_entries() {
            Ok(entries) => {
                tracing::debug!(path = %store.path.display(), entries = entries.len(), "opened store");
            }
            Err(StoreError::Corrupt { path, source }) => {
                tracing::error!(
                    path = %path.display(),
                    error = %source,
                    "store document is corrupt; starting with an empty store"
                );
                store.persist(&Entries::new())?;
            }
            Err(e) => return Err(e),
        }
        Ok(store)
    }

    fn at(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(DOCUMENT_NAME),
            lock_path: dir.join(LOCK_NAME),
        })
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Takes the store lock. It is released when the returned file is dropped.
    fn lock(&self, exclusive: bool) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        if exclusive {
            file.lock()?;
        } else {
            file.lock_shared()?;
        }
        Ok(file)
    }

    fn read_locked(&self) -> Result<Entries, StoreError> {
        let _lock = self.lock(false)?;
        self.read_entries()
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Entries::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Re-reads the document under the exclusive lock, applies `mutate` and
    /// writes the result back if `mutate` reports a change.
    fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let _lock = self.lock(true)?;
        let mut entries = self.read_entries()?;
        if mutate(&mut entries) {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        let body = serde_json::to_vec(entries).map_err(|source| StoreError::Serialize {
            context: self.path.display().to_string(),
            source,
        })?;
        let temp = self.path.with_file_name(TEMP_NAME);
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_locked()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            changed
        })
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_locked()?.into_keys().collect())
    }
}

/// Directory holding the store for `origin`.
///
/// Named after the origin's host (readable) plus a hash prefix of the full
/// origin, so `http://` and `https://` or different ports never share data.
#[must_use]
pub fn origin_dir(data_dir: &Path, origin: &str) -> PathBuf {
    let host = origin
        .split_once("://")
        .map_or(origin, |(_, rest)| rest)
        .trim_end_matches('/');
    let readable: String = host
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    let digest = format!("{:x}", Sha256::digest(origin.trim_end_matches('/').as_bytes()));
    data_dir.join(format!("{readable}-{}", &digest[..12]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_dir_is_stable_and_readable() {
        let base = Path::new("/data");
        let a = origin_dir(base, "http://localhost:5000");
        let b = origin_dir(base, "http://localhost:5000/");
        assert_eq!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("localhost_5000-"), "got {name}");
    }

    #[test]
    fn origin_dir_differs_by_scheme() {
        let base = Path::new("/data");
        assert_ne!(
            origin_dir(base, "http://moto.example.com"),
            origin_dir(base, "https://moto.example.com")
        );
    }
}
