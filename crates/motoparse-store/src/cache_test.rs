use std::collections::BTreeMap;

use serde::Deserialize;

use super::*;
use crate::error::StoreError;
use crate::store::MemoryStore;

/// Store whose every operation fails, standing in for disabled storage or
/// an exceeded quota.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
    fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Entry {
    name: String,
    count: u32,
}

fn memory_cache() -> (Arc<MemoryStore>, KeyValueCache) {
    let store = Arc::new(MemoryStore::new());
    let cache = KeyValueCache::new(store.clone());
    (store, cache)
}

#[test]
fn set_then_get_round_trips() {
    let (_, cache) = memory_cache();
    let entry = Entry {
        name: "XR250".into(),
        count: 3,
    };
    cache.set("k", &entry);
    assert_eq!(cache.get::<Entry>("k"), Some(entry));
}

#[test]
fn round_trips_arbitrary_json_values() {
    let (_, cache) = memory_cache();
    let value = serde_json::json!({ "nested": [1, "two", null, { "x": true }] });
    cache.set("json", &value);
    assert_eq!(cache.get::<serde_json::Value>("json"), Some(value));

    let mut map = BTreeMap::new();
    map.insert("a".to_string(), "b".to_string());
    cache.set("map", &map);
    assert_eq!(cache.get::<BTreeMap<String, String>>("map"), Some(map));
}

#[test]
fn unknown_key_is_absent() {
    let (_, cache) = memory_cache();
    assert_eq!(cache.get::<Entry>("nope"), None);
    assert_eq!(cache.lookup::<Entry>("nope"), Lookup::Missing);
}

#[test]
fn set_overwrites_previous_value() {
    let (_, cache) = memory_cache();
    cache.set("k", &1u32);
    cache.set("k", &2u32);
    assert_eq!(cache.get::<u32>("k"), Some(2));
}

#[test]
fn undecodable_value_is_absent_and_reported_corrupt() {
    let (store, cache) = memory_cache();
    store.set("k", "{not json".to_string()).unwrap();
    assert_eq!(cache.get::<Entry>("k"), None);
    assert_eq!(cache.lookup::<Entry>("k"), Lookup::Corrupt);

    cache.set("n", &5u32);
    assert_eq!(cache.lookup::<Entry>("n"), Lookup::Corrupt);
}

#[test]
fn remove_deletes_one_entry() {
    let (_, cache) = memory_cache();
    cache.set("a", &1u32);
    cache.set("b", &2u32);
    cache.remove("a");
    cache.remove("missing");
    assert_eq!(cache.get::<u32>("a"), None);
    assert_eq!(cache.get::<u32>("b"), Some(2));
}

#[test]
fn clear_without_namespace_wipes_foreign_entries_too() {
    let (store, cache) = memory_cache();
    store.set("written-by-someone-else", "1".to_string()).unwrap();
    cache.set("mine", &1u32);
    cache.clear();
    assert!(store.is_empty());
}

#[test]
fn namespaced_cache_prefixes_keys_and_scopes_clear() {
    let store = Arc::new(MemoryStore::new());
    let cache = KeyValueCache::with_namespace(store.clone(), "motoparse:");
    store.set("foreign", "1".to_string()).unwrap();

    cache.set("https://host/a", &1u32);
    assert_eq!(
        store.get("motoparse:https://host/a").unwrap().as_deref(),
        Some("1")
    );
    assert_eq!(cache.get::<u32>("https://host/a"), Some(1));

    cache.clear();
    assert_eq!(cache.get::<u32>("https://host/a"), None);
    assert_eq!(store.get("foreign").unwrap().as_deref(), Some("1"));
}

#[test]
fn namespace_gets_separator_and_clear_spares_longer_prefixes() {
    let store = Arc::new(MemoryStore::new());
    let short = KeyValueCache::with_namespace(store.clone(), "moto");
    let long = KeyValueCache::with_namespace(store.clone(), "motoparse:");
    assert_eq!(short.namespace(), "moto:");
    assert_eq!(long.namespace(), "motoparse:");

    short.set("a", &1u32);
    long.set("a", &2u32);
    assert_eq!(store.get("moto:a").unwrap().as_deref(), Some("1"));

    short.clear();
    assert_eq!(short.get::<u32>("a"), None);
    assert_eq!(long.get::<u32>("a"), Some(2));
}

#[test]
fn clones_share_the_store() {
    let (_, cache) = memory_cache();
    let other = cache.clone();
    cache.set("k", &7u32);
    assert_eq!(other.get::<u32>("k"), Some(7));
}

#[test]
fn broken_store_fails_soft() {
    let cache = KeyValueCache::new(Arc::new(BrokenStore));
    cache.set("k", &1u32);
    cache.remove("k");
    cache.clear();
    assert_eq!(cache.get::<u32>("k"), None);
    assert_eq!(cache.lookup::<u32>("k"), Lookup::Failed);

    let namespaced = KeyValueCache::with_namespace(Arc::new(BrokenStore), "ns:");
    namespaced.clear();
}
