//! Capacity-bounded map with least-recently-used eviction.
//!
//! The recency structure is a plain order vector with move-to-end on every
//! touch: linear, but the capacities this crate is built for (tens of
//! entries) make a linked structure pointless. Eviction order is the only
//! observable contract.
//!
//! Not thread-safe. [`ImageLoader`](crate::loader::ImageLoader) serializes
//! all access behind its own lock; standalone users must do the same.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// A fixed-capacity map that evicts the least-recently-used entry on
/// overflow.
///
/// `get` is a read-with-promotion: a hit marks the key most-recently-used.
/// Callers that must not disturb recency order (tests, diagnostics) use
/// [`peek`](Self::peek) instead.
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    /// Recency order, least-recent first. Every key in `entries` appears
    /// here exactly once.
    order: Vec<K>,
    max_items: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a cache holding at most `max_items` entries.
    ///
    /// `max_items` is clamped to a minimum of 1; a zero-capacity cache
    /// would evict every entry it is handed.
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            max_items: max_items.max(1),
        }
    }

    /// Look up `key`, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key)
    }

    /// Look up `key` without touching recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or overwrite `key`, marking it most-recently-used.
    ///
    /// If the cache then exceeds capacity, the least-recently-used entry is
    /// evicted. Capacity is checked only after the new entry is already the
    /// most recent, so the key being inserted is never its own victim.
    pub fn put(&mut self, key: K, value: V) {
        let existed = self.entries.insert(key.clone(), value).is_some();
        if existed {
            self.touch(&key);
        } else {
            self.order.push(key);
        }
        if self.order.len() > self.max_items {
            let victim = self.order.remove(0);
            debug!(key = ?victim, "evicting least-recently-used cache entry");
            self.entries.remove(&victim);
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity (post-clamp).
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Move `key` to the most-recent end of the order vector.
    fn touch(&mut self, key: &K) {
        if let Some(i) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(i);
            self.order.push(k);
        }
    }
}
