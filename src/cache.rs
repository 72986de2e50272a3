// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Bounded in-memory cache with least-frequently-used eviction.
//!
//! The cache is a capacity-bounded key → entry mapping. Every lookup
//! increments the key's hit count; when a new key arrives at capacity, the
//! entry with the lowest hit count is evicted, ties broken by oldest
//! insertion. All eviction work happens synchronously inside [`put`] and
//! [`replace_all`] — there is no background eviction task.
//!
//! The cache itself is not thread-safe; the owning store serializes access
//! (one critical section spans cache mutation and tier I/O).
//!
//! [`put`]: BoundedCache::put
//! [`replace_all`]: BoundedCache::replace_all

use std::collections::HashMap;

use crate::entry::{Entry, Snapshot};

/// Per-key eviction metadata.
#[derive(Debug, Clone)]
struct CacheSlot {
    entry: Entry,
    /// Number of recorded lookups for this key.
    hits: u64,
    /// Monotonic insertion sequence; lower = inserted earlier.
    seq: u64,
}

/// Capacity-bounded LFU map from key to [`Entry`].
#[derive(Debug)]
pub struct BoundedCache {
    slots: HashMap<String, CacheSlot>,
    capacity: usize,
    next_seq: u64,
    evictions: u64,
}

impl BoundedCache {
    /// Create an empty cache.
    ///
    /// `capacity` must be positive; [`StoreConfig::validate`] rejects zero
    /// before a cache is ever constructed.
    ///
    /// [`StoreConfig::validate`]: crate::StoreConfig::validate
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            capacity,
            next_seq: 0,
            evictions: 0,
        }
    }

    /// Look up a key, recording the access.
    ///
    /// A hit increments the key's hit count. This never falls through to
    /// another tier; fallback is the store's job.
    pub fn get(&mut self, key: &str) -> Option<&Entry> {
        let slot = self.slots.get_mut(key)?;
        slot.hits = slot.hits.saturating_add(1);
        Some(&slot.entry)
    }

    /// Insert or overwrite an entry.
    ///
    /// Overwriting an existing key keeps its hit count and insertion order.
    /// A new key at capacity first evicts the current LFU victim.
    pub fn put(&mut self, key: impl Into<String>, entry: Entry) {
        let key = key.into();
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.entry = entry;
            return;
        }

        if self.slots.len() >= self.capacity {
            if let Some(victim) = self.victim() {
                self.slots.remove(&victim);
                self.evictions += 1;
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(
            key,
            CacheSlot {
                entry,
                hits: 0,
                seq,
            },
        );
    }

    /// Remove a key, returning its entry if present.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.slots.remove(key).map(|slot| slot.entry)
    }

    /// Discard current contents and rebuild from a full mapping.
    ///
    /// Each entry is admitted through the normal [`put`](Self::put) path, so
    /// a mapping larger than the capacity is trimmed by the same eviction
    /// rule that governs steady-state inserts.
    pub fn replace_all(&mut self, snapshot: Snapshot) {
        self.slots.clear();
        for (key, entry) in snapshot {
            self.put(key, entry);
        }
    }

    /// Check for a key without recording an access.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Current entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Configured capacity bound.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached keys, sorted for stable comparison.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.slots.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Total evictions since construction.
    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// The key next in line for eviction: lowest hit count, ties broken by
    /// oldest insertion.
    fn victim(&self) -> Option<String> {
        self.slots
            .iter()
            .min_by_key(|(_, slot)| (slot.hits, slot.seq))
            .map(|(key, _)| key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        Entry::from_value(value).unwrap()
    }

    fn prefixes(prefix: &str) -> Entry {
        entry(json!({ "prefixes": [prefix] }))
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = BoundedCache::new(4);
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = BoundedCache::new(4);
        cache.put("1", prefixes("!"));

        assert_eq!(cache.get("1"), Some(&prefixes("!")));
        assert!(cache.get("2").is_none());
    }

    #[test]
    fn test_put_overwrites_without_evicting() {
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));
        cache.put("2", prefixes("?"));

        cache.put("1", prefixes("#"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("1"), Some(&prefixes("#")));
        assert!(cache.contains("2"));
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn test_capacity_bound_holds() {
        let mut cache = BoundedCache::new(3);
        for i in 0..10 {
            cache.put(i.to_string(), prefixes("!"));
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.evictions(), 7);
    }

    #[test]
    fn test_evicts_least_frequently_used() {
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));
        cache.put("2", prefixes("?"));

        // "1" becomes hot, "2" stays cold
        cache.get("1");
        cache.get("1");
        cache.get("1");

        cache.put("3", prefixes("#"));

        assert!(cache.contains("1"));
        assert!(!cache.contains("2"), "cold key should be the victim");
        assert!(cache.contains("3"));
    }

    #[test]
    fn test_eviction_tie_broken_by_oldest_insertion() {
        let mut cache = BoundedCache::new(2);
        cache.put("old", prefixes("!"));
        cache.put("young", prefixes("?"));

        // Both keys have zero hits
        cache.put("new", prefixes("#"));

        assert!(!cache.contains("old"));
        assert!(cache.contains("young"));
        assert!(cache.contains("new"));
    }

    #[test]
    fn test_contains_does_not_count_as_access() {
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));
        cache.put("2", prefixes("?"));

        // Probing "1" repeatedly must not protect it
        for _ in 0..5 {
            assert!(cache.contains("1"));
        }
        cache.get("2");

        cache.put("3", prefixes("#"));

        assert!(!cache.contains("1"));
        assert!(cache.contains("2"));
    }

    #[test]
    fn test_remove() {
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));

        assert_eq!(cache.remove("1"), Some(prefixes("!")));
        assert_eq!(cache.remove("1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_all_discards_previous_contents() {
        let mut cache = BoundedCache::new(4);
        cache.put("stale", prefixes("!"));

        let mut snapshot = Snapshot::new();
        snapshot.insert("1".into(), prefixes("?"));
        snapshot.insert("2".into(), prefixes("#"));
        cache.replace_all(snapshot);

        assert!(!cache.contains("stale"));
        assert_eq!(cache.keys(), vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_replace_all_respects_capacity() {
        let mut cache = BoundedCache::new(3);

        let mut snapshot = Snapshot::new();
        for i in 0..8 {
            snapshot.insert(i.to_string(), prefixes("!"));
        }
        cache.replace_all(snapshot);

        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_frequency_survives_overwrite() {
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));
        cache.put("2", prefixes("?"));

        cache.get("1");
        cache.put("1", prefixes("#"));

        // "1" keeps its hit count, so "2" is still the victim
        cache.put("3", prefixes("$"));

        assert!(cache.contains("1"));
        assert!(!cache.contains("2"));
    }

    #[test]
    fn test_hot_key_sequence() {
        // capacity=2; insert "1", "2"; read "1" three times; insert "3"
        // → "2" is evicted, "1" and "3" remain.
        let mut cache = BoundedCache::new(2);
        cache.put("1", prefixes("!"));
        cache.put("2", prefixes("?"));

        for _ in 0..3 {
            assert!(cache.get("1").is_some());
        }

        cache.put("3", prefixes("#"));

        assert_eq!(cache.keys(), vec!["1".to_string(), "3".to_string()]);
        assert_eq!(cache.evictions(), 1);
    }
}
