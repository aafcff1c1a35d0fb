use std::collections::HashMap;
use std::sync::Mutex;

use super::{CacheStats, CacheStrategy, StrategyKind, lock};

/// Fixed-capacity cache that evicts the least frequently used entry.
///
/// Each entry counts its accesses. Eviction scans for the minimum, which is
/// fine at the capacities this cache is used with. Ties go to the entry that
/// was inserted first.
pub struct LfuCache<V> {
    capacity: usize,
    state: Mutex<LfuState<V>>,
}

struct LfuEntry<V> {
    value: V,
    frequency: u64,
    inserted: u64,
}

struct LfuState<V> {
    entries: HashMap<String, LfuEntry<V>>,
    inserted: u64,
    hits: u64,
    misses: u64,
}

impl<V> LfuCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LfuState {
                entries: HashMap::new(),
                inserted: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Recorded access frequency of a key, without touching it.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        lock(&self.state).entries.get(key).map(|e| e.frequency)
    }
}

impl<V> LfuState<V> {
    fn evict_least_frequent(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.frequency, entry.inserted))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            log::trace!("lfu evicted {key}");
        }
    }
}

impl<V: Clone + Send> CacheStrategy<V> for LfuCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut state = lock(&self.state);

        let found = state.entries.get_mut(key).map(|entry| {
            entry.frequency += 1;
            entry.value.clone()
        });
        match found {
            Some(_) => state.hits += 1,
            None => state.misses += 1,
        }
        found
    }

    fn set(&self, key: &str, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut state = lock(&self.state);

        if let Some(entry) = state.entries.get_mut(key) {
            entry.value = value;
            entry.frequency += 1;
            return;
        }

        if state.entries.len() >= self.capacity {
            state.evict_least_frequent();
        }

        state.inserted += 1;
        let inserted = state.inserted;
        state.entries.insert(
            key.to_string(),
            LfuEntry {
                value,
                frequency: 1,
                inserted,
            },
        );
    }

    fn discard(&self, key: &str) {
        let mut state = lock(&self.state);
        state.entries.remove(key);
        state.hits = state.hits.saturating_sub(1);
        state.misses += 1;
    }

    fn clear(&self) {
        lock(&self.state).entries.clear();
    }

    fn stats(&self) -> CacheStats {
        let state = lock(&self.state);
        CacheStats {
            strategy: StrategyKind::Lfu,
            enabled: true,
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
            capacity: Some(self.capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn frequency_counts_hits_and_overwrites() {
        let cache = LfuCache::new(4);
        cache.set("a", 1);
        assert_eq!(cache.frequency("a"), Some(1));

        cache.get("a");
        cache.get("a");
        cache.set("a", 2);
        assert_eq!(cache.frequency("a"), Some(4));
        assert_eq!(cache.get("a"), Some(2));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (3, 0));
    }

    #[test]
    fn discard_drops_entry_and_recounts_hit() {
        let cache = LfuCache::new(2);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        cache.discard("a");

        assert_eq!(cache.frequency("a"), None);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (0, 1, 0));
    }

    #[test]
    fn evicts_least_frequently_used() {
        let cache = LfuCache::new(2);
        cache.set("hot", 1);
        cache.set("cold", 2);
        cache.get("hot");
        cache.set("new", 3);

        assert_eq!(cache.get("cold"), None);
        assert_eq!(cache.get("hot"), Some(1));
        assert_eq!(cache.get("new"), Some(3));
    }

    #[test]
    fn ties_evict_oldest_insert() {
        let cache = LfuCache::new(2);
        cache.set("first", 1);
        cache.set("second", 2);
        cache.set("third", 3);

        assert_eq!(cache.frequency("first"), None);
        assert_eq!(cache.frequency("second"), Some(1));
        assert_eq!(cache.frequency("third"), Some(1));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = LfuCache::new(0);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), None);
    }

    proptest! {
        /// On overflow the evicted key had the minimal frequency.
        #[test]
        fn evicted_key_has_minimal_frequency(
            capacity in 1usize..8,
            touches in proptest::collection::vec(0usize..8, 0..32),
        ) {
            let cache = LfuCache::new(capacity);
            let keys: Vec<String> = (0..capacity).map(|i| format!("k{i}")).collect();
            for (i, key) in keys.iter().enumerate() {
                cache.set(key, i);
            }
            for touch in touches {
                cache.get(&keys[touch % capacity]);
            }

            let frequencies: Vec<u64> = keys
                .iter()
                .map(|k| cache.frequency(k).unwrap_or(0))
                .collect();
            let minimum = frequencies.iter().copied().min().unwrap_or(0);

            cache.set("overflow", usize::MAX);

            let evicted: Vec<usize> = (0..capacity)
                .filter(|&i| cache.frequency(&keys[i]).is_none())
                .collect();
            prop_assert_eq!(evicted.len(), 1);
            prop_assert_eq!(frequencies[evicted[0]], minimum);
            prop_assert_eq!(cache.frequency("overflow"), Some(1));
        }
    }
}
