//! Cache Store Module
//!
//! Concurrent key-value map with whole-store replacement for flush.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::cache::Value;

type Map = DashMap<String, Value>;

// == Store ==
/// Sharded map of keys to values.
///
/// Single-key operations lock only the shard holding the key. The map itself
/// sits behind an `Arc` so `flush` can swap in a fresh one in a single step;
/// every operation works on the map that is current when it starts.
#[derive(Debug, Default)]
pub struct Store {
    current: RwLock<Arc<Map>>,
}

impl Store {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> Arc<Map> {
        Arc::clone(&self.current.read())
    }

    // == Insert ==
    /// Stores a value, replacing any previous one.
    pub fn insert(&self, key: &str, value: Value) {
        self.map().insert(key.to_string(), value);
    }

    // == Insert If Absent ==
    /// Stores a value only if the key is free. Returns whether it was stored.
    pub fn insert_if_absent(&self, key: &str, value: Value) -> bool {
        let map = self.map();
        let inserted = match map.entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        };
        inserted
    }

    // == Get ==
    /// Returns a clone of the value at `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let map = self.map();
        let value = map.get(key).map(|entry| entry.value().clone());
        value
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.map().contains_key(key)
    }

    // == Remove ==
    /// Removes the key. Returns whether anything was there.
    pub fn remove(&self, key: &str) -> bool {
        self.map().remove(key).is_some()
    }

    // == Update Or Init ==
    /// Runs `f` on the value at `key` while holding its shard lock, first
    /// inserting `init()` if the key is free.
    pub fn update_or_init<T>(
        &self,
        key: &str,
        init: impl FnOnce() -> Value,
        f: impl FnOnce(&mut Value) -> T,
    ) -> T {
        let map = self.map();
        let mut entry = map.entry(key.to_string()).or_insert_with(init);
        let result = f(entry.value_mut());
        result
    }

    // == Swap Empty ==
    /// Replaces the whole map with an empty one. Returns the number of
    /// entries dropped with the old map.
    pub fn swap_empty(&self) -> usize {
        let old = std::mem::replace(&mut *self.current.write(), Arc::new(Map::new()));
        old.len()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}
