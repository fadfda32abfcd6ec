//! Local persistence for parse results and search history.
//!
//! Layering, bottom-up:
//! - [`KeyValueStore`]: the origin-scoped string store ([`FileStore`] on
//!   disk, [`MemoryStore`] in process).
//! - [`KeyValueCache`]: JSON values over a store. Never surfaces errors.
//! - [`HistoryStore`]: the bounded recent-URL list kept in the cache.

pub mod cache;
pub mod error;
pub mod file_store;
pub mod history;
pub mod store;

pub use cache::{KeyValueCache, Lookup, NAMESPACE_SEPARATOR};
pub use error::StoreError;
pub use file_store::FileStore;
pub use history::{HistoryStore, DEFAULT_HISTORY_LIMIT, HISTORY_KEY};
pub use store::{KeyValueStore, MemoryStore};
