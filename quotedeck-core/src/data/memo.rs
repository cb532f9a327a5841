//! Bounded in-memory memoization for provider results.
//!
//! Least-recently-used eviction once `capacity` entries are held, plus a
//! time-to-live after which an entry is treated as absent. Values are handed
//! out as `Arc`s so a cache hit returns the very same instance.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    /// `None` when the TTL is too large to represent: never expires.
    expires_at: Option<Instant>,
    last_used: u64,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Hit/miss counters, exposed for the status bar and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// LRU + TTL cache keyed by an explicit value.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    capacity: usize,
    ttl: Duration,
    tick: u64,
    stats: MemoStats,
}

impl<K: Hash + Eq + Clone, V> MemoCache<K, V> {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
            tick: 0,
            stats: MemoStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    /// Look up a live entry, refreshing its recency. Expired entries are dropped.
    pub fn get(&mut self, key: &K) -> Option<Arc<V>> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) => !entry.is_live(now),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }

        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            Arc::clone(&entry.value)
        })
    }

    /// Insert a value, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: K, value: V) -> Arc<V> {
        self.purge_expired();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.tick += 1;
        let value = Arc::new(value);
        self.entries.insert(
            key,
            Entry {
                value: Arc::clone(&value),
                expires_at: Instant::now().checked_add(self.ttl),
                last_used: self.tick,
            },
        );
        value
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// Errors from `fetch` are passed through and nothing is stored.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: &K,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(hit) = self.get(key) {
            self.stats.hits += 1;
            return Ok(hit);
        }
        self.stats.misses += 1;
        let value = fetch()?;
        Ok(self.insert(key.clone(), value))
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}
